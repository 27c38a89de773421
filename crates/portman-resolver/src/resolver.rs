//! Fixed-point dependency discovery with feature re-stating.
//!
//! A package's full feature set may only become known after it has already
//! been stated: `foo[a]` is queried, and later some dependency asks for
//! `foo[b]`. Every node therefore keeps the union of all features requested
//! so far, and every query uses that union rather than the features captured
//! when the worklist entry was pushed. Widening a node's features resets it
//! so it is stated once more; stale worklist entries find the node already
//! stated and are skipped.

use std::collections::VecDeque;

use petgraph::graph::NodeIndex;
use portman_core::package_ref::PackageRef;
use portman_util::errors::PortmanError;

use crate::graph::{NodeRegistry, Presence, QueueState, StatState};
use crate::order;
use crate::query::{DependencyQuery, InstallOutcome, RemovalOutcome, RemovalQuery};

/// A query answer with the install/removal specifics stripped away.
enum Statement {
    Satisfied,
    Conflict(PackageRef),
    Requires(Vec<PackageRef>),
}

impl From<InstallOutcome> for Statement {
    fn from(outcome: InstallOutcome) -> Self {
        match outcome {
            InstallOutcome::AlreadySatisfied => Statement::Satisfied,
            InstallOutcome::FeatureConflict(package) => Statement::Conflict(package),
            InstallOutcome::Dependencies(deps) => Statement::Requires(deps),
        }
    }
}

impl From<RemovalOutcome> for Statement {
    fn from(outcome: RemovalOutcome) -> Self {
        match outcome {
            RemovalOutcome::NotInstalled => Statement::Satisfied,
            RemovalOutcome::Dependents(deps) => Statement::Requires(deps),
        }
    }
}

/// Worklist-driven builder of a [`NodeRegistry`].
///
/// One engine serves one resolution run. After an error the engine must be
/// discarded: its flags describe queries that may already have had effects.
#[derive(Debug, Default)]
pub struct ResolverEngine {
    registry: NodeRegistry,
    worklist: VecDeque<NodeIndex>,
    queries: usize,
}

impl ResolverEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a requested package, merging its features into the shared node.
    pub fn request(&mut self, package: &PackageRef) {
        self.schedule(package);
    }

    /// Drain the worklist using an install query.
    ///
    /// Fails with [`PortmanError::FeatureConflict`] as soon as the query
    /// reports one.
    pub fn run_install<Q>(&mut self, query: &mut Q) -> Result<(), PortmanError>
    where
        Q: DependencyQuery + ?Sized,
    {
        self.run(|package| query.query_install_deps(package).map(Statement::from))
    }

    /// Drain the worklist using a removal query.
    pub fn run_removal<Q>(&mut self, query: &mut Q) -> Result<(), PortmanError>
    where
        Q: RemovalQuery + ?Sized,
    {
        self.run(|package| query.query_removal_deps(package).map(Statement::from))
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    pub fn into_registry(self) -> NodeRegistry {
        self.registry
    }

    /// Number of queries issued so far.
    pub fn query_count(&self) -> usize {
        self.queries
    }

    /// Fetch-or-create the node, widen it, and push it if unscheduled.
    fn schedule(&mut self, package: &PackageRef) -> NodeIndex {
        let idx = self.registry.get_or_insert(&package.name);
        let node = self.registry.node_mut(idx);

        if node.widen(&package.features) {
            tracing::trace!("{} widened to {}", package.name, node.package_ref());
        }
        if node.queue_state() == QueueState::Unqueued {
            node.mark_queued();
            self.worklist.push_back(idx);
        }
        idx
    }

    fn run<F>(&mut self, mut stat: F) -> Result<(), PortmanError>
    where
        F: FnMut(&PackageRef) -> Result<Statement, PortmanError>,
    {
        while let Some(idx) = self.worklist.pop_front() {
            let node = self.registry.node(idx);
            if node.stat_state() == StatState::Stated {
                continue;
            }

            let current = node.package_ref();
            tracing::debug!("stating {current}");
            self.queries += 1;

            match stat(&current)? {
                Statement::Conflict(package) => {
                    return Err(PortmanError::FeatureConflict {
                        package: package.to_string(),
                    });
                }
                Statement::Satisfied => {
                    self.registry.node_mut(idx).mark_stated(Presence::Satisfied);
                }
                Statement::Requires(deps) => {
                    self.registry.node_mut(idx).mark_stated(Presence::Required);
                    for dep in &deps {
                        let dep_idx = self.schedule(dep);
                        self.registry.add_edge(idx, dep_idx);
                    }
                }
            }
        }

        tracing::debug!(
            "resolution reached a fixed point: {} packages, {} queries",
            self.registry.len(),
            self.queries
        );
        Ok(())
    }
}

/// Resolve `requested` and its transitive dependencies into an install order.
///
/// Every package in the result comes after all of its dependencies.
/// Packages the query reports as already satisfied are left out.
pub fn resolve<Q>(requested: &[PackageRef], query: &mut Q) -> Result<Vec<PackageRef>, PortmanError>
where
    Q: DependencyQuery + ?Sized,
{
    let mut engine = ResolverEngine::new();
    for package in requested {
        engine.request(package);
    }
    engine.run_install(query)?;

    let mut registry = engine.into_registry();
    Ok(order::order_all(&mut registry))
}

/// Order `unneeded` packages, and everything that depends on them, for removal.
///
/// Dependants come before the packages they depend on. Packages the query
/// reports as not installed are left out.
pub fn order_for_removal<Q>(
    unneeded: &[PackageRef],
    query: &mut Q,
) -> Result<Vec<PackageRef>, PortmanError>
where
    Q: RemovalQuery + ?Sized,
{
    let mut engine = ResolverEngine::new();
    for package in unneeded {
        engine.request(package);
    }
    engine.run_removal(query)?;

    let mut registry = engine.into_registry();
    Ok(order::order_all(&mut registry))
}
