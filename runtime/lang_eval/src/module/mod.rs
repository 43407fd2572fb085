//! Module archives, manifests and the load/unload lifecycle.
//!
//! ```text
//! archive bytes ─▶ ModuleArchive ─▶ parse_manifest(data.lmc)
//!                                        │ check_compatibility
//!                                        ▼
//!                      ModuleUnit (Loading) ─▶ native load / script runner
//!                                        │
//!                     ok ────────────────┴──────────────── err
//!                     ▼                                    ▼
//!              Active, exports published          rollback, Closed
//! ```

mod archive;
mod bridge;
mod errors;
mod lifecycle;
mod manifest;
mod namespace;
mod unit;
mod version;

pub use archive::{ArchiveEntry, ModuleArchive, LANG_ENTRY, MANIFEST_ENTRY};
pub use bridge::{ModuleBridge, NativeModule, NativeModuleFactories, NativeModuleFactory};
pub use errors::ModuleError;
pub use manifest::{parse_manifest, ModuleManifest, ModuleType};
pub use namespace::{is_identifier, validate_identifier, Namespace, RESERVED_PREFIX};
pub use unit::{ModuleHandle, ModuleState, ModuleUnit};
pub use version::LangVersion;
