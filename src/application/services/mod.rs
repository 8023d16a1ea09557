pub mod manifest_resolver;

pub use manifest_resolver::{ManifestResolveError, ManifestResolver, ResolvedManifest};
