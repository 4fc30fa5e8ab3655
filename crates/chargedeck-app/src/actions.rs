//! Action execution: spawn background tasks for gateway calls
//!
//! The update function never touches the network; it returns
//! [`UpdateAction`]s, and this module turns each into a spawned tokio task
//! that reports back through the message channel. Every task gets a clone of
//! the session captured at dispatch time -- a refreshed session is picked up
//! by the next dispatch, not mid-flight.

use std::sync::Arc;

use tokio::sync::mpsc;

use chargedeck_api::{ApiClient, ResourceClient};
use chargedeck_core::prelude::*;
use chargedeck_core::{AuthSession, OptionsSource, PageRequest, Record, SelectOption};

use crate::dashboard::DashboardCard;
use crate::entities::EntityKind;
use crate::handler::UpdateAction;
use crate::message::{Message, MutationKind};

/// Map a gateway error for the message channel: session failures become the
/// dedicated invalidation message, everything else its user text.
fn report(error: Error, msg_tx: &mpsc::Sender<Message>) -> Option<String> {
    if matches!(error, Error::SessionExpired | Error::NotAuthenticated) {
        let _ = msg_tx.try_send(Message::SessionInvalid {
            message: error.user_message(),
        });
        None
    } else {
        Some(error.user_message())
    }
}

async fn send(msg_tx: &mpsc::Sender<Message>, message: Message) {
    if msg_tx.send(message).await.is_err() {
        warn!("Message channel closed; dropping result");
    }
}

/// Execute one action in the background.
pub fn handle_action(
    action: UpdateAction,
    api: Arc<ApiClient>,
    session: AuthSession,
    msg_tx: mpsc::Sender<Message>,
) {
    match action {
        UpdateAction::FetchPage {
            entity,
            request,
            seq,
        } => {
            tokio::spawn(async move {
                let resource = entity.descriptor().resource;
                let result = fetch_page(&api, &session, resource, &request).await;
                let result = match result {
                    Ok(data) => Ok(data),
                    Err(e) => match report(e, &msg_tx) {
                        Some(text) => Err(text),
                        None => return,
                    },
                };
                send(&msg_tx, Message::PageLoaded { entity, seq, result }).await;
            });
        }

        UpdateAction::FetchRelated {
            child,
            scope_segment,
            parent_id,
            page,
            page_size,
            sort_field,
        } => {
            tokio::spawn(async move {
                let resource = child.descriptor().resource;
                let request = PageRequest::new(page, page_size, sort_field);
                let result = resource
                    .get_paged_scoped(&api, &session, scope_segment, &parent_id, &request)
                    .await
                    .map(chargedeck_core::PageData::from);
                let result = match result {
                    Ok(data) => Ok(data),
                    Err(e) => match report(e, &msg_tx) {
                        Some(text) => Err(text),
                        None => return,
                    },
                };
                send(&msg_tx, Message::RelatedLoaded { parent_id, result }).await;
            });
        }

        UpdateAction::FetchOptions { requests } => {
            for (field, source) in requests {
                let api = api.clone();
                let session = session.clone();
                let msg_tx = msg_tx.clone();
                tokio::spawn(async move {
                    let result = fetch_options(&api, &session, source).await;
                    let result = match result {
                        Ok(options) => Ok(options),
                        Err(e) => match report(e, &msg_tx) {
                            Some(text) => Err(text),
                            None => return,
                        },
                    };
                    send(&msg_tx, Message::OptionsLoaded { field, result }).await;
                });
            }
        }

        UpdateAction::Create {
            entity,
            record,
            parent_id,
        } => spawn_mutation(api, session, msg_tx, entity, MutationKind::Create, parent_id, {
            move |api, session| async move {
                entity
                    .descriptor()
                    .resource
                    .create(&api, &session, &record)
                    .await
                    .map(|_| ())
            }
        }),

        UpdateAction::UpdateRecord {
            entity,
            id,
            record,
            parent_id,
        } => spawn_mutation(api, session, msg_tx, entity, MutationKind::Update, parent_id, {
            move |api, session| async move {
                entity
                    .descriptor()
                    .resource
                    .update(&api, &session, &id, &record)
                    .await
                    .map(|_| ())
            }
        }),

        UpdateAction::DeleteRecord {
            entity,
            id,
            parent_id,
        } => spawn_mutation(api, session, msg_tx, entity, MutationKind::Delete, parent_id, {
            move |api, session| async move {
                entity.descriptor().resource.delete(&api, &session, &id).await
            }
        }),

        UpdateAction::ToggleActivate { entity, id } => {
            spawn_mutation(api, session, msg_tx, entity, MutationKind::ToggleActivate, None, {
                move |api, session| async move {
                    entity
                        .descriptor()
                        .resource
                        .toggle_activate(&api, &session, &id)
                        .await
                }
            })
        }

        UpdateAction::Approve { id, response } => spawn_mutation(
            api,
            session,
            msg_tx,
            EntityKind::AccountRequests,
            MutationKind::Approve,
            None,
            move |api, session| async move {
                chargedeck_api::approve_account_request(&api, &session, &id, &response).await
            },
        ),

        UpdateAction::Reject { id, response } => spawn_mutation(
            api,
            session,
            msg_tx,
            EntityKind::AccountRequests,
            MutationKind::Reject,
            None,
            move |api, session| async move {
                chargedeck_api::reject_account_request(&api, &session, &id, &response).await
            },
        ),

        UpdateAction::FetchQrCode { station_id } => {
            tokio::spawn(async move {
                let result =
                    chargedeck_api::station_qr_code(&api, &session, &station_id).await;
                let result = match result {
                    Ok(payload) => Ok(payload),
                    Err(e) => match report(e, &msg_tx) {
                        Some(text) => Err(text),
                        None => return,
                    },
                };
                send(&msg_tx, Message::QrCodeLoaded { station_id, result }).await;
            });
        }

        UpdateAction::FetchDashboard => {
            // Fire-and-forget parallel fetches; each card reports alone.
            let cards: [(DashboardCard, EntityKind); 4] = [
                (DashboardCard::StationsByOperator, EntityKind::Stations),
                (DashboardCard::BaysByStatus, EntityKind::ChargingBays),
                (DashboardCard::ConnectorsByType, EntityKind::Connectors),
                (DashboardCard::RequestsByStatus, EntityKind::AccountRequests),
            ];
            for (card, entity) in cards {
                let api = api.clone();
                let session = session.clone();
                let msg_tx = msg_tx.clone();
                tokio::spawn(async move {
                    let result = entity.descriptor().resource.list(&api, &session).await;
                    let result = match result {
                        Ok(records) => Ok(records),
                        Err(e) => match report(e, &msg_tx) {
                            Some(text) => Err(text),
                            None => return,
                        },
                    };
                    send(&msg_tx, Message::DashboardLoaded { card, result }).await;
                });
            }
        }
    }
}

async fn fetch_page(
    api: &ApiClient,
    session: &AuthSession,
    resource: ResourceClient,
    request: &PageRequest,
) -> Result<chargedeck_core::PageData> {
    let response = resource.get_paged(api, session, request).await?;
    Ok(response.into())
}

async fn fetch_options(
    api: &ApiClient,
    session: &AuthSession,
    source: OptionsSource,
) -> Result<Vec<SelectOption>> {
    match source {
        OptionsSource::Inline(pairs) => Ok(pairs
            .iter()
            .map(|(v, l)| SelectOption::new(*v, *l))
            .collect()),
        OptionsSource::Remote {
            path,
            value_field,
            label_field,
        } => {
            let records: Vec<Record> = if path == "Connectors/types" {
                chargedeck_api::connector_types(api, session).await?
            } else {
                ResourceClient::new(path, "options").list(api, session).await?
            };
            Ok(records
                .iter()
                .filter_map(|record| {
                    let value = record.display(value_field);
                    if value.is_empty() {
                        return None;
                    }
                    let label = {
                        let l = record.display(label_field);
                        if l.is_empty() {
                            value.clone()
                        } else {
                            l
                        }
                    };
                    Some(SelectOption::new(value, label))
                })
                .collect())
        }
    }
}

/// Spawn one mutation task reporting a [`Message::MutationDone`].
fn spawn_mutation<F, Fut>(
    api: Arc<ApiClient>,
    session: AuthSession,
    msg_tx: mpsc::Sender<Message>,
    entity: EntityKind,
    kind: MutationKind,
    parent_id: Option<String>,
    op: F,
) where
    F: FnOnce(Arc<ApiClient>, AuthSession) -> Fut + Send + 'static,
    Fut: std::future::Future<Output = Result<()>> + Send,
{
    tokio::spawn(async move {
        let result = match op(api, session).await {
            Ok(()) => Ok(()),
            Err(e) => match report(e, &msg_tx) {
                Some(text) => Err(text),
                None => return,
            },
        };
        send(
            &msg_tx,
            Message::MutationDone {
                entity,
                kind,
                parent_id,
                result,
            },
        )
        .await;
    });
}
