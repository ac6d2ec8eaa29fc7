// Structs that exist in the site resource

// Volume sources - these get resolved by priority in the compiler
/// Code volume sources
mod code;
pub use self::code::{CodeVolumeSpec, GitVolumeSource};

/// Media volume sources and remote backends
mod media;
pub use self::media::{GCSVolumeSource, MediaVolumeSpec, S3VolumeSource};

/// Routes the site answers on
mod route;
pub use self::route::RouteSpec;

/// One-shot install parameters
mod bootstrap;
pub use self::bootstrap::WordpressBootstrapSpec;
