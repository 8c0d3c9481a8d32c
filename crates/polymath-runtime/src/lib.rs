pub mod collection;
pub mod config;
pub mod convert;
pub mod dispatch;
pub mod signature;

pub use collection::{deep_map, deep_map2};
pub use config::{ConfigError, MathConfig, MatrixMode};
pub use convert::try_promote;
pub use dispatch::{ConvertFn, Dispatcher, NativeFn, Resolution};
pub use signature::{Signature, TypeSet};
