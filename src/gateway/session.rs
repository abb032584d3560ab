use actix::prelude::*;
use actix_web_actors::ws;
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::domain::notification::Role;

use super::registry::{
    CloseSession, ConnectionRegistry, Deregister, Frame, Register, SessionHandle,
};

// ============================================================================
// Websocket Session Actor
// ============================================================================
//
// One actor per upgraded connection. Registers itself with the registry on
// start and deregisters on stop. The server only pushes frames; inbound
// text is ignored. Ping/pong keeps the connection alive and stale clients
// are dropped.
//
// ============================================================================

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct WsSession {
    role: Role,
    user_id: Uuid,
    token: Uuid,
    registry: Addr<ConnectionRegistry>,
    last_heartbeat: Instant,
}

impl WsSession {
    pub fn new(role: Role, user_id: Uuid, registry: Addr<ConnectionRegistry>) -> Self {
        Self {
            role,
            user_id,
            token: Uuid::new_v4(),
            registry,
            last_heartbeat: Instant::now(),
        }
    }

    fn start_heartbeat(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |act, ctx| {
            if Instant::now().duration_since(act.last_heartbeat) > CLIENT_TIMEOUT {
                tracing::debug!(
                    role = act.role.as_str(),
                    user_id = %act.user_id,
                    "Client heartbeat timed out, dropping session"
                );
                ctx.stop();
                return;
            }
            ctx.ping(b"");
        });
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        self.start_heartbeat(ctx);

        let addr = ctx.address();
        self.registry.do_send(Register {
            role: self.role,
            user_id: self.user_id,
            handle: SessionHandle {
                token: self.token,
                frames: addr.clone().recipient(),
                close: addr.recipient(),
            },
        });

        tracing::info!(
            role = self.role.as_str(),
            user_id = %self.user_id,
            "Websocket session opened"
        );
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        self.registry.do_send(Deregister {
            role: self.role,
            user_id: self.user_id,
            token: self.token,
        });

        tracing::info!(
            role = self.role.as_str(),
            user_id = %self.user_id,
            "Websocket session closed"
        );
    }
}

impl Handler<Frame> for WsSession {
    type Result = ();

    fn handle(&mut self, msg: Frame, ctx: &mut Self::Context) {
        ctx.text(msg.0);
    }
}

impl Handler<CloseSession> for WsSession {
    type Result = ();

    fn handle(&mut self, _: CloseSession, ctx: &mut Self::Context) {
        ctx.close(Some(ws::CloseReason {
            code: ws::CloseCode::Policy,
            description: Some("Replaced by a newer connection".to_string()),
        }));
        ctx.stop();
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Text(_) | ws::Message::Binary(_)) => {
                // Push-only channel; client payloads are ignored.
            }
            Ok(ws::Message::Continuation(_) | ws::Message::Nop) => {}
            Err(e) => {
                tracing::debug!(
                    role = self.role.as_str(),
                    user_id = %self.user_id,
                    error = %e,
                    "Websocket protocol error"
                );
                ctx.stop();
            }
        }
    }
}
