//! 支付业务服务层

mod processor;
mod profile_effect;

pub use processor::{PurchaseOutcome, PurchaseProcessor};
pub use profile_effect::ProfileEffectService;
