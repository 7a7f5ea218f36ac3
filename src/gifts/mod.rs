//! Viewer gifts: the static catalog and the bridge into the simulation

pub mod catalog;
pub mod dispatch;

pub use catalog::{ActionConfig, ActionKind, EffectClass, Gift, GiftTier, resolve_action};
pub use dispatch::{GiftDispatcher, GiftEvent};
