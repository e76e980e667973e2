use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;

use tracing::{debug, trace};

use crate::artifact::{ZkArtifact, parse_fully_qualified_name};
use crate::error::ArtifactError;
use crate::loader::ArtifactLoader;

type ResolveFuture<'a> = Pin<Box<dyn Future<Output = Result<(), ArtifactError>> + Send + 'a>>;

/// Collect the bytecode of every contract `artifact` may deploy at runtime,
/// transitively.
///
/// Dependencies are visited depth-first in the order the compiler emitted
/// them, each distinct `sourceName:contractName` at most once. The root's own
/// bytecode is not part of the result, even when it lists itself. Any load
/// failure aborts the whole resolution.
pub async fn extract_factory_deps<L>(
    loader: &L,
    artifact: &ZkArtifact,
) -> Result<Vec<String>, ArtifactError>
where
    L: ArtifactLoader + ?Sized,
{
    let mut visited = HashSet::from([artifact.identity()]);
    let mut bytecodes = Vec::new();

    collect_factory_deps(loader, artifact, &mut visited, &mut bytecodes).await?;

    debug!(
        contract = %artifact.identity(),
        count = bytecodes.len(),
        "factory dependencies resolved"
    );
    Ok(bytecodes)
}

fn collect_factory_deps<'a, L>(
    loader: &'a L,
    artifact: &'a ZkArtifact,
    visited: &'a mut HashSet<String>,
    bytecodes: &'a mut Vec<String>,
) -> ResolveFuture<'a>
where
    L: ArtifactLoader + ?Sized,
{
    Box::pin(async move {
        for name in artifact.factory_deps.values() {
            // A fully qualified name is already the identity, so it can be
            // skipped without a load. A bare name is only known after loading.
            let fully_qualified = parse_fully_qualified_name(name).is_some();
            if fully_qualified && visited.contains(name) {
                trace!(dependency = %name, "factory dependency already visited");
                continue;
            }

            let dependency = loader.load_artifact(name).await?;
            let identity = dependency.identity();
            // Marked before descending so that cycles terminate.
            if !visited.insert(identity.clone()) {
                trace!(dependency = %identity, "factory dependency already visited");
                continue;
            }
            debug!(
                parent = %artifact.identity(),
                dependency = %identity,
                "factory dependency loaded"
            );
            bytecodes.push(dependency.bytecode.clone());

            collect_factory_deps(loader, &dependency, visited, bytecodes).await?;
        }
        Ok(())
    })
}
