//! Ephemeral container audit service
//!
//! Every audited action appends one row to the audit trail. The container row
//! itself is inserted the first time the container is seen; both writes share a
//! single transaction.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info};

use helmsman_common::HelmsmanError;
use helmsman_persistence::EphemeralContainerPersistence;
use helmsman_persistence::model::{
    ContainerAction, EphemeralContainerActionInfo, EphemeralContainerInfo,
};

use crate::model::{EphemeralContainerAuditRecord, EphemeralContainerRequest};

pub struct EphemeralContainerAuditor<R> {
    repository: Arc<R>,
}

impl<R: EphemeralContainerPersistence> EphemeralContainerAuditor<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Record `action` for the container addressed by `request`.
    ///
    /// A create for a container that already has a row is rejected with
    /// `HelmsmanError::ContainerAlreadyPresent` before anything is written.
    pub async fn audit_ephemeral_container_action(
        &self,
        request: &EphemeralContainerRequest,
        action: ContainerAction,
    ) -> anyhow::Result<EphemeralContainerAuditRecord> {
        let container_name = request.basic_data.container_name.as_str();

        let existing = self
            .repository
            .container_find_by_name(
                request.cluster_id,
                &request.namespace,
                &request.pod_name,
                container_name,
            )
            .await
            .inspect_err(|e| {
                error!(
                    error = %e,
                    cluster_id = request.cluster_id,
                    namespace = %request.namespace,
                    pod_name = %request.pod_name,
                    container_name,
                    "error in finding ephemeral container in the database"
                )
            })?;

        if existing.is_some() && action == ContainerAction::Create {
            error!(
                cluster_id = request.cluster_id,
                namespace = %request.namespace,
                pod_name = %request.pod_name,
                container_name,
                "container already present in the provided pod"
            );
            return Err(HelmsmanError::ContainerAlreadyPresent {
                cluster_id: request.cluster_id,
                namespace: request.namespace.clone(),
                pod_name: request.pod_name.clone(),
                container_name: container_name.to_string(),
            }
            .into());
        }

        let tx = self
            .repository
            .start_tx()
            .await
            .inspect_err(|e| error!(error = %e, "error in creating transaction"))?;

        // The handle is moved into exactly one of commit or rollback
        match self.record_action(&tx, request, action, existing).await {
            Ok(record) => {
                self.repository.commit_tx(tx).await.inspect_err(|e| {
                    error!(error = %e, request = ?request, "error in committing transaction")
                })?;
                info!(
                    ephemeral_container_id = record.ephemeral_container_id,
                    ephemeral_container_action_id = record.action_id,
                    action = %action,
                    "transaction committed successfully"
                );
                Ok(record)
            }
            Err(e) => {
                if let Err(rollback_err) = self.repository.rollback_tx(tx).await {
                    info!(
                        error = %rollback_err,
                        cluster_id = request.cluster_id,
                        namespace = %request.namespace,
                        pod_name = %request.pod_name,
                        container_name,
                        "error in rolling back transaction"
                    );
                }
                Err(e)
            }
        }
    }

    /// Audit trail of a container, oldest first. Empty when the container is unknown.
    pub async fn container_audit_trail(
        &self,
        cluster_id: i32,
        namespace: &str,
        pod_name: &str,
        container_name: &str,
    ) -> anyhow::Result<Vec<EphemeralContainerActionInfo>> {
        let Some(container) = self
            .repository
            .container_find_by_name(cluster_id, namespace, pod_name, container_name)
            .await?
        else {
            return Ok(Vec::new());
        };

        self.repository.container_actions_find(container.id).await
    }

    async fn record_action(
        &self,
        tx: &R::Tx,
        request: &EphemeralContainerRequest,
        action: ContainerAction,
        existing: Option<EphemeralContainerInfo>,
    ) -> anyhow::Result<EphemeralContainerAuditRecord> {
        let (container_id, container_created, externally_created) = match existing {
            Some(container) => (container.id, false, container.is_externally_created),
            None => {
                let mut container = request.to_container_info()?;
                // Unknown container being accessed or terminated: it was created outside helmsman
                container.is_externally_created = action != ContainerAction::Create;
                self.repository
                    .container_save(tx, &mut container)
                    .await
                    .inspect_err(|e| error!(error = %e, "failed to save ephemeral container"))?;
                (container.id, true, container.is_externally_created)
            }
        };

        let mut audit = EphemeralContainerActionInfo {
            id: 0,
            ephemeral_container_id: container_id,
            action_type: action,
            performed_by: request.user_id,
            performed_at: Utc::now(),
        };
        self.repository
            .container_action_save(tx, &mut audit)
            .await
            .inspect_err(|e| error!(error = %e, "failed to save ephemeral container action audit"))?;

        Ok(EphemeralContainerAuditRecord {
            ephemeral_container_id: container_id,
            action_id: audit.id,
            action_type: action,
            performed_by: audit.performed_by,
            performed_at: audit.performed_at,
            container_created,
            externally_created,
        })
    }
}
