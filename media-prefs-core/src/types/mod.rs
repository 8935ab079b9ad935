//! 类型定义模块

mod account;
mod profile;

pub use account::{Account, SubscriptionId};
pub use profile::ProfileName;
