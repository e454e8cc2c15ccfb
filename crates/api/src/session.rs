//! 合成身份会话
//!
//! 所有登录、注册、刷新请求都返回同一个配置好的身份，令牌只保证每次不同，
//! 不做任何校验。会话变化通过广播通道通知进程内的订阅方。

use std::sync::Arc;

use dispatch_core::models::{AuthUser, Session, UserMetadata};
use dispatch_core::IdentityConfig;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

/// 会话变化事件
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "session", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthEvent {
    SignedIn(Session),
    TokenRefreshed(Session),
    SignedOut,
}

/// 授权方式，对应 `grant_type` 查询参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grant {
    Password,
    RefreshToken,
}

impl Grant {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "password" => Some(Grant::Password),
            "refresh_token" => Some(Grant::RefreshToken),
            _ => None,
        }
    }
}

const EVENT_CAPACITY: usize = 16;

#[derive(Debug, Clone)]
pub struct SessionHub {
    identity: Arc<IdentityConfig>,
    events: broadcast::Sender<AuthEvent>,
}

impl SessionHub {
    pub fn new(identity: IdentityConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            identity: Arc::new(identity),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    pub fn user(&self) -> AuthUser {
        AuthUser {
            id: self.identity.user_id.clone(),
            email: self.identity.email.clone(),
            role: "authenticated".to_string(),
            user_metadata: UserMetadata {
                display_name: self.identity.display_name.clone(),
            },
        }
    }

    /// 签发一次会话并广播对应事件
    pub fn issue(&self, grant: Grant) -> Session {
        let prefix = match grant {
            Grant::Password => "access",
            Grant::RefreshToken => "refreshed",
        };
        let session = Session {
            access_token: format!("{prefix}-{}", uuid::Uuid::new_v4().simple()),
            token_type: "bearer".to_string(),
            expires_in: self.identity.token_ttl_seconds,
            refresh_token: format!("refresh-{}", uuid::Uuid::new_v4().simple()),
            user: self.user(),
        };
        let event = match grant {
            Grant::Password => AuthEvent::SignedIn(session.clone()),
            Grant::RefreshToken => AuthEvent::TokenRefreshed(session.clone()),
        };
        self.publish(event);
        session
    }

    pub fn sign_out(&self) {
        self.publish(AuthEvent::SignedOut);
    }

    fn publish(&self, event: AuthEvent) {
        // 没有订阅方时发送会失败，可以忽略
        if self.events.send(event).is_err() {
            debug!("No auth event subscribers");
        }
    }
}
