use actix::prelude::*;
use std::collections::HashMap;
use uuid::Uuid;

use crate::domain::notification::Role;

// ============================================================================
// Connection Registry Actor
// ============================================================================
//
// Map from (role, user id) to the live session for that user. The policy is
// latest-connection-wins: registering a session for a key that already has
// one closes the old session before the new handle is stored. Pushes are
// fire-and-forget; a push that cannot be enqueued evicts the entry. There is
// no queueing for disconnected recipients, missed frames are lost.
//
// ============================================================================

/// A JSON frame pushed to one websocket session.
#[derive(Message, Clone)]
#[rtype(result = "()")]
pub struct Frame(pub String);

/// Tells a session to close because a newer connection took its key.
#[derive(Message)]
#[rtype(result = "()")]
pub struct CloseSession;

/// The registry's view of a session: where frames go and how to close it.
/// The token identifies one physical connection, so a replaced session's
/// late deregistration cannot evict its successor.
#[derive(Clone)]
pub struct SessionHandle {
    pub token: Uuid,
    pub frames: Recipient<Frame>,
    pub close: Recipient<CloseSession>,
}

#[derive(Default)]
pub struct ConnectionRegistry {
    sessions: HashMap<(Role, Uuid), SessionHandle>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Actor for ConnectionRegistry {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        tracing::info!("ConnectionRegistry started");
    }
}

// ============================================================================
// Messages
// ============================================================================

#[derive(Message)]
#[rtype(result = "()")]
pub struct Register {
    pub role: Role,
    pub user_id: Uuid,
    pub handle: SessionHandle,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct Deregister {
    pub role: Role,
    pub user_id: Uuid,
    pub token: Uuid,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct Push {
    pub role: Role,
    pub user_id: Uuid,
    pub frame: String,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct Broadcast {
    pub role: Role,
    pub frame: String,
}

#[derive(Message)]
#[rtype(result = "usize")]
pub struct ConnectionCount;

// ============================================================================
// Handlers
// ============================================================================

impl Handler<Register> for ConnectionRegistry {
    type Result = ();

    fn handle(&mut self, msg: Register, _: &mut Self::Context) {
        let key = (msg.role, msg.user_id);

        if let Some(previous) = self.sessions.insert(key, msg.handle) {
            tracing::info!(
                role = msg.role.as_str(),
                user_id = %msg.user_id,
                "Replacing existing session, closing the old one"
            );
            previous.close.do_send(CloseSession);
        } else {
            tracing::debug!(
                role = msg.role.as_str(),
                user_id = %msg.user_id,
                "Session registered"
            );
        }
    }
}

impl Handler<Deregister> for ConnectionRegistry {
    type Result = ();

    fn handle(&mut self, msg: Deregister, _: &mut Self::Context) {
        let key = (msg.role, msg.user_id);

        // Only remove the entry if it still points at the departing session.
        if self
            .sessions
            .get(&key)
            .is_some_and(|handle| handle.token == msg.token)
        {
            self.sessions.remove(&key);
            tracing::debug!(
                role = msg.role.as_str(),
                user_id = %msg.user_id,
                "Session deregistered"
            );
        }
    }
}

impl Handler<Push> for ConnectionRegistry {
    type Result = ();

    fn handle(&mut self, msg: Push, _: &mut Self::Context) {
        let key = (msg.role, msg.user_id);

        let Some(handle) = self.sessions.get(&key) else {
            // Nobody connected; the frame is dropped.
            return;
        };

        if handle.frames.try_send(Frame(msg.frame)).is_err() {
            tracing::debug!(
                role = msg.role.as_str(),
                user_id = %msg.user_id,
                "Push failed, evicting session"
            );
            self.sessions.remove(&key);
        }
    }
}

impl Handler<Broadcast> for ConnectionRegistry {
    type Result = ();

    fn handle(&mut self, msg: Broadcast, _: &mut Self::Context) {
        let mut dead = Vec::new();

        for (key, handle) in self
            .sessions
            .iter()
            .filter(|((role, _), _)| *role == msg.role)
        {
            if handle.frames.try_send(Frame(msg.frame.clone())).is_err() {
                dead.push(*key);
            }
        }

        for key in dead {
            tracing::debug!(
                role = key.0.as_str(),
                user_id = %key.1,
                "Broadcast failed, evicting session"
            );
            self.sessions.remove(&key);
        }
    }
}

impl Handler<ConnectionCount> for ConnectionRegistry {
    type Result = usize;

    fn handle(&mut self, _: ConnectionCount, _: &mut Self::Context) -> usize {
        self.sessions.len()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    struct Recorder {
        frames: Arc<Mutex<Vec<String>>>,
        closed: Arc<AtomicBool>,
    }

    impl Actor for Recorder {
        type Context = Context<Self>;
    }

    impl Handler<Frame> for Recorder {
        type Result = ();

        fn handle(&mut self, msg: Frame, _: &mut Self::Context) {
            self.frames.lock().unwrap().push(msg.0);
        }
    }

    impl Handler<CloseSession> for Recorder {
        type Result = ();

        fn handle(&mut self, _: CloseSession, ctx: &mut Self::Context) {
            self.closed.store(true, Ordering::SeqCst);
            ctx.stop();
        }
    }

    struct Session {
        addr: Addr<Recorder>,
        token: Uuid,
        frames: Arc<Mutex<Vec<String>>>,
        closed: Arc<AtomicBool>,
    }

    fn spawn_session() -> Session {
        let frames = Arc::new(Mutex::new(Vec::new()));
        let closed = Arc::new(AtomicBool::new(false));
        let addr = Recorder {
            frames: frames.clone(),
            closed: closed.clone(),
        }
        .start();
        Session {
            addr,
            token: Uuid::new_v4(),
            frames,
            closed,
        }
    }

    fn handle_of(session: &Session) -> SessionHandle {
        SessionHandle {
            token: session.token,
            frames: session.addr.clone().recipient(),
            close: session.addr.clone().recipient(),
        }
    }

    async fn settle() {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }

    #[actix::test]
    async fn test_second_registration_closes_first() {
        let registry = ConnectionRegistry::new().start();
        let user_id = Uuid::new_v4();

        let first = spawn_session();
        let second = spawn_session();

        registry.do_send(Register {
            role: Role::Customer,
            user_id,
            handle: handle_of(&first),
        });
        registry.do_send(Register {
            role: Role::Customer,
            user_id,
            handle: handle_of(&second),
        });
        registry.do_send(Push {
            role: Role::Customer,
            user_id,
            frame: "hello".to_string(),
        });
        settle().await;

        assert!(first.closed.load(Ordering::SeqCst));
        assert!(!second.closed.load(Ordering::SeqCst));
        assert!(first.frames.lock().unwrap().is_empty());
        assert_eq!(*second.frames.lock().unwrap(), vec!["hello".to_string()]);
        assert_eq!(registry.send(ConnectionCount).await.unwrap(), 1);
    }

    #[actix::test]
    async fn test_push_to_dead_session_evicts_entry() {
        let registry = ConnectionRegistry::new().start();
        let user_id = Uuid::new_v4();

        let session = spawn_session();
        registry.do_send(Register {
            role: Role::Agent,
            user_id,
            handle: handle_of(&session),
        });
        settle().await;

        // Kill the session out from under the registry.
        session.addr.do_send(CloseSession);
        settle().await;

        registry.do_send(Push {
            role: Role::Agent,
            user_id,
            frame: "ready".to_string(),
        });
        settle().await;

        assert_eq!(registry.send(ConnectionCount).await.unwrap(), 0);
    }

    #[actix::test]
    async fn test_stale_deregister_keeps_successor() {
        let registry = ConnectionRegistry::new().start();
        let user_id = Uuid::new_v4();

        let first = spawn_session();
        let second = spawn_session();

        registry.do_send(Register {
            role: Role::Partner,
            user_id,
            handle: handle_of(&first),
        });
        registry.do_send(Register {
            role: Role::Partner,
            user_id,
            handle: handle_of(&second),
        });
        // The replaced session reports its own shutdown afterwards.
        registry.do_send(Deregister {
            role: Role::Partner,
            user_id,
            token: first.token,
        });
        settle().await;

        assert_eq!(registry.send(ConnectionCount).await.unwrap(), 1);
    }

    #[actix::test]
    async fn test_broadcast_reaches_role_only() {
        let registry = ConnectionRegistry::new().start();

        let agent = spawn_session();
        let customer = spawn_session();

        registry.do_send(Register {
            role: Role::Agent,
            user_id: Uuid::new_v4(),
            handle: handle_of(&agent),
        });
        registry.do_send(Register {
            role: Role::Customer,
            user_id: Uuid::new_v4(),
            handle: handle_of(&customer),
        });
        registry.do_send(Broadcast {
            role: Role::Agent,
            frame: "order ready".to_string(),
        });
        settle().await;

        assert_eq!(agent.frames.lock().unwrap().len(), 1);
        assert!(customer.frames.lock().unwrap().is_empty());
    }

    #[actix::test]
    async fn test_push_without_connection_is_dropped() {
        let registry = ConnectionRegistry::new().start();

        registry.do_send(Push {
            role: Role::Customer,
            user_id: Uuid::new_v4(),
            frame: "nobody home".to_string(),
        });
        settle().await;

        assert_eq!(registry.send(ConnectionCount).await.unwrap(), 0);
    }
}
