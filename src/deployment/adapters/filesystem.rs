//! Filesystem metadata builder writing manifests under a capability root.
//!
//! Each deployment is published to `<project>/<deployment>/` as
//! `manifest.json` plus a `manifest.json.sha256` checksum. A manifest whose
//! checksum matches the stored one is not rewritten. Names that are not a
//! single normal path component are refused before touching the tree.

use async_trait::async_trait;
use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use std::io;
use std::sync::Arc;
use tracing::{debug, info};

use crate::deployment::{
    domain::{Deployment, Package, RepositoryManifest, RequestContext, is_single_path_segment},
    ports::{MetadataError, RepositoryMetadataBuilder},
};

const MANIFEST_FILE: &str = "manifest.json";
const CHECKSUM_FILE: &str = "manifest.json.sha256";

/// Metadata builder publishing manifests to a directory tree.
#[derive(Debug, Clone)]
pub struct FilesystemMetadataBuilder {
    root: Arc<Dir>,
}

impl FilesystemMetadataBuilder {
    /// Opens `root`, creating it when missing.
    ///
    /// # Errors
    ///
    /// Returns [`io::Error`] when the directory cannot be created or
    /// opened.
    pub fn open(root: &Utf8Path) -> io::Result<Self> {
        Dir::create_ambient_dir_all(root, ambient_authority())?;
        let dir = Dir::open_ambient_dir(root, ambient_authority())?;
        Ok(Self { root: Arc::new(dir) })
    }

    async fn run_blocking<F, T>(&self, f: F) -> Result<T, MetadataError>
    where
        F: FnOnce(&Dir) -> io::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let root = Arc::clone(&self.root);
        tokio::task::spawn_blocking(move || f(&root))
            .await
            .map_err(|err| MetadataError::Unavailable(err.to_string()))?
            .map_err(MetadataError::io)
    }
}

fn deployment_directory(deployment: &Deployment, name: &str) -> Result<String, MetadataError> {
    if !is_single_path_segment(name) {
        return Err(MetadataError::InvalidPath(name.to_owned()));
    }
    Ok(format!("{}/{name}", deployment.project()))
}

#[async_trait]
impl RepositoryMetadataBuilder for FilesystemMetadataBuilder {
    async fn create_repository_metadata(
        &self,
        deployment: &Deployment,
        packages: &[Package],
        context: &RequestContext,
    ) -> Result<RepositoryManifest, MetadataError> {
        let manifest = RepositoryManifest::build(deployment, packages);
        let contents = manifest
            .to_json()
            .map_err(|err| MetadataError::Serialization(err.to_string()))?;
        let checksum = RepositoryManifest::checksum(&contents);
        let directory = deployment_directory(deployment, deployment.name())?;

        let written = self
            .run_blocking(move |root| {
                let checksum_path = format!("{directory}/{CHECKSUM_FILE}");
                let stored = root.read_to_string(&checksum_path).ok();
                if stored.as_deref() == Some(checksum.as_str()) {
                    return Ok(false);
                }
                root.create_dir_all(&directory)?;
                root.write(format!("{directory}/{MANIFEST_FILE}"), contents)?;
                root.write(&checksum_path, checksum)?;
                Ok(true)
            })
            .await?;

        if written {
            info!(
                deployment = deployment.name(),
                user = context.username(),
                packages = manifest.packages().len(),
                "published repository metadata"
            );
        } else {
            debug!(deployment = deployment.name(), "repository metadata unchanged");
        }
        Ok(manifest)
    }

    async fn remove_repository_metadata(
        &self,
        context: &RequestContext,
        deployment: &Deployment,
        old_name: &str,
    ) -> Result<(), MetadataError> {
        let directory = deployment_directory(deployment, old_name)?;
        self.run_blocking(move |root| match root.remove_dir_all(&directory) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err),
            _ => Ok(()),
        })
        .await?;
        info!(
            deployment = deployment.name(),
            old_name,
            user = context.username(),
            "removed repository metadata"
        );
        Ok(())
    }
}
