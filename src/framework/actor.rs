//! # Generic Actor Server
//!
//! `ResourceActor` owns the store for one entity type and processes requests one at a time
//! in its own Tokio task. Exclusive ownership of the store inside the task is what keeps
//! concurrent clients from racing on the same work order; no locks are involved.

use crate::framework::client::ResourceClient;
use crate::framework::entity::ActorEntity;
use crate::framework::error::FrameworkError;
use crate::framework::message::ResourceRequest;
use std::collections::BTreeMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The generic actor that manages a collection of entities.
///
/// # Usage Pattern
///
/// 1.  **Create**: `ResourceActor::new(buffer)` returns the actor and its client.
/// 2.  **Wire**: pass dependencies (other clients) into `actor.run(context)`.
/// 3.  **Run**: spawn the run loop in a background task.
///
/// # Operations
///
/// * **Create**: takes the next sequential id, builds the entity with
///   `T::from_create_params`, runs `on_create` and stores it.
/// * **Get**: returns a clone of the stored entity, or `None`.
/// * **List**: returns clones of every entity for which `T::matches(filter)` holds, in id order.
/// * **Update** / **Action**: run the hook on a working copy and commit it only if the hook
///   succeeds, so a rejected request never leaves a half-applied entity behind.
/// * **Delete**: runs `on_delete`, then removes the entity.
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: BTreeMap<T::Id, T>,
    next_id: u32,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates a new `ResourceActor` and its associated `ResourceClient`.
    ///
    /// `buffer_size` is the capacity of the request channel; when it is full, client calls
    /// wait for space.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: BTreeMap::new(),
            next_id: 1,
        };
        let client = ResourceClient::new(sender);
        (actor, client)
    }

    /// Runs the actor's event loop, processing messages until every client is dropped.
    ///
    /// The `context` is handed to every entity hook.
    pub async fn run(mut self, context: T::Context) {
        // "WorkOrder" instead of "fieldops::model::work_order::WorkOrder"
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let id = T::Id::from(self.next_id);

                    let result = match T::from_create_params(id.clone(), params) {
                        Ok(mut item) => match item.on_create(&context).await {
                            Ok(()) => {
                                self.next_id += 1;
                                self.store.insert(id.clone(), item);
                                info!(entity_type, %id, size = self.store.len(), "Created");
                                Ok(id)
                            }
                            Err(e) => {
                                warn!(entity_type, error = %e, "on_create failed");
                                Err(FrameworkError::EntityError(Box::new(e)))
                            }
                        },
                        Err(e) => {
                            warn!(entity_type, error = %e, "Create failed");
                            Err(FrameworkError::EntityError(Box::new(e)))
                        }
                    };
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    debug!(entity_type, %id, found = item.is_some(), "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::List { filter, respond_to } => {
                    let items: Vec<T> = self
                        .store
                        .values()
                        .filter(|item| item.matches(&filter))
                        .cloned()
                        .collect();
                    debug!(entity_type, ?filter, matched = items.len(), "List");
                    let _ = respond_to.send(Ok(items));
                }
                ResourceRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?update, "Update");
                    let Some(current) = self.store.get(&id) else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    let mut working = current.clone();
                    let result = match working.on_update(update, &context).await {
                        Ok(()) => {
                            self.store.insert(id.clone(), working.clone());
                            info!(entity_type, %id, "Updated");
                            Ok(working)
                        }
                        Err(e) => {
                            warn!(entity_type, %id, error = %e, "Update failed");
                            Err(FrameworkError::EntityError(Box::new(e)))
                        }
                    };
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Delete { id, respond_to } => {
                    debug!(entity_type, %id, "Delete");
                    let Some(item) = self.store.get(&id) else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    let result = match item.on_delete(&context).await {
                        Ok(()) => {
                            self.store.remove(&id);
                            info!(entity_type, %id, size = self.store.len(), "Deleted");
                            Ok(())
                        }
                        Err(e) => {
                            warn!(entity_type, %id, error = %e, "on_delete failed");
                            Err(FrameworkError::EntityError(Box::new(e)))
                        }
                    };
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?action, "Action");
                    let Some(current) = self.store.get(&id) else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    let mut working = current.clone();
                    let result = match working.handle_action(action, &context).await {
                        Ok(outcome) => {
                            self.store.insert(id.clone(), working);
                            info!(entity_type, %id, "Action ok");
                            Ok(outcome)
                        }
                        Err(e) => {
                            warn!(entity_type, %id, error = %e, "Action failed");
                            Err(FrameworkError::EntityError(Box::new(e)))
                        }
                    };
                    let _ = respond_to.send(result);
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use thiserror::Error;

    #[derive(Debug, Error)]
    #[error("rejected: {0}")]
    struct Rejected(&'static str);

    #[derive(Debug, Clone, PartialEq)]
    struct Counter {
        id: u32,
        label: String,
        value: i64,
    }

    #[async_trait]
    impl ActorEntity for Counter {
        type Id = u32;
        type Create = String;
        type Update = String;
        type Action = i64;
        type ActionResult = i64;
        type Filter = Option<String>;
        type Context = ();
        type Error = Rejected;

        fn from_create_params(id: u32, label: String) -> Result<Self, Rejected> {
            if label.is_empty() {
                return Err(Rejected("empty label"));
            }
            Ok(Self {
                id,
                label,
                value: 0,
            })
        }

        fn matches(&self, filter: &Option<String>) -> bool {
            filter.as_ref().map_or(true, |wanted| *wanted == self.label)
        }

        async fn on_update(&mut self, label: String, _ctx: &()) -> Result<(), Rejected> {
            // Mutate first so a rollback is observable.
            self.label = label;
            if self.label.is_empty() {
                return Err(Rejected("empty label"));
            }
            Ok(())
        }

        async fn handle_action(&mut self, delta: i64, _ctx: &()) -> Result<i64, Rejected> {
            self.value += delta;
            if self.value < 0 {
                return Err(Rejected("negative"));
            }
            Ok(self.value)
        }
    }

    fn spawn() -> ResourceClient<Counter> {
        let (actor, client) = ResourceActor::<Counter>::new(8);
        tokio::spawn(actor.run(()));
        client
    }

    #[tokio::test]
    async fn test_failed_create_does_not_consume_an_id() {
        let client = spawn();
        assert!(client.create(String::new()).await.is_err());
        assert_eq!(client.create("a".into()).await.unwrap(), 1);
        assert_eq!(client.create("b".into()).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_failed_update_and_action_leave_entity_untouched() {
        let client = spawn();
        let id = client.create("pump".into()).await.unwrap();
        assert_eq!(client.perform_action(id, 5).await.unwrap(), 5);

        let err = client.update(id, String::new()).await.unwrap_err();
        assert!(err.into_entity_error::<Rejected>().is_ok());
        let err = client.perform_action(id, -10).await.unwrap_err();
        assert!(err.into_entity_error::<Rejected>().is_ok());

        let stored = client.get(id).await.unwrap().unwrap();
        assert_eq!(stored.label, "pump");
        assert_eq!(stored.value, 5);
    }

    #[tokio::test]
    async fn test_list_filters_in_id_order_and_missing_ids_are_not_found() {
        let client = spawn();
        for label in ["b", "a", "b"] {
            client.create(label.into()).await.unwrap();
        }

        let ids: Vec<u32> = client
            .list(Some("b".into()))
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(client.list(None).await.unwrap().len(), 3);

        assert!(client.get(9).await.unwrap().is_none());
        assert!(matches!(
            client.perform_action(9, 1).await,
            Err(FrameworkError::NotFound(_))
        ));
        client.delete(2).await.unwrap();
        assert!(matches!(
            client.delete(2).await,
            Err(FrameworkError::NotFound(_))
        ));
    }
}
