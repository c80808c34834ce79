use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The shopper role is named `user` on the wire.
    User,
    Admin,
    Delivery,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::Delivery => "delivery",
        }
    }
}

/// A verified caller. Each role carries only what that role may act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Principal {
    Shopper { shopper_id: Uuid },
    Admin { admin_id: Uuid },
    Delivery { courier_id: Uuid },
}

impl Principal {
    pub fn new(subject_id: Uuid, role: Role) -> Self {
        match role {
            Role::User => Principal::Shopper {
                shopper_id: subject_id,
            },
            Role::Admin => Principal::Admin {
                admin_id: subject_id,
            },
            Role::Delivery => Principal::Delivery {
                courier_id: subject_id,
            },
        }
    }

    pub fn subject_id(&self) -> Uuid {
        match *self {
            Principal::Shopper { shopper_id } => shopper_id,
            Principal::Admin { admin_id } => admin_id,
            Principal::Delivery { courier_id } => courier_id,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Principal::Shopper { .. } => Role::User,
            Principal::Admin { .. } => Role::Admin,
            Principal::Delivery { .. } => Role::Delivery,
        }
    }
}
