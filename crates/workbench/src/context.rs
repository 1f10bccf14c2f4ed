use relation_engine::{DenseFactory, RelationFactory};
use relation_graph::{Graph, GraphManager};
use relation_registry::{
    DefinitionCompiler, DomainManager, Entity, FunctionManager, Manager, Namespace, NoopCompiler,
    ProgramManager, Relation, RelationManager, SharedNamespace,
};
use std::rc::Rc;

/// Reserved name of the always-present default/scratch relation and graph.
///
/// Objects carrying it are excluded from persistence and from collision
/// dialogs by convention.
pub const DEFAULT_NAME: &str = "$";

/// The application context.
///
/// Owns the shared namespace, the four entity managers wired to it, and the
/// graph manager over its own private namespace — graph names deliberately
/// never collide with relation/domain/function/program names.
pub struct Workbench {
    namespace: SharedNamespace,
    pub domains: DomainManager,
    pub functions: FunctionManager,
    pub programs: ProgramManager,
    pub relations: RelationManager,
    pub graphs: GraphManager,
    compiler: Rc<dyn DefinitionCompiler>,
    factory: Rc<dyn RelationFactory>,
}

impl Workbench {
    pub fn new(compiler: Rc<dyn DefinitionCompiler>, factory: Rc<dyn RelationFactory>) -> Self {
        let namespace = Namespace::shared();
        let mut workbench = Self {
            namespace: namespace.clone(),
            domains: Manager::with_namespace(namespace.clone()),
            functions: Manager::with_namespace(namespace.clone()),
            programs: Manager::with_namespace(namespace.clone()),
            relations: Manager::with_namespace(namespace),
            graphs: GraphManager::new(),
            compiler,
            factory,
        };
        workbench.seed_defaults();
        workbench
    }

    /// Context over the reference backend and the pass-through compiler.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(Rc::new(NoopCompiler), Rc::new(DenseFactory))
    }

    fn seed_defaults(&mut self) {
        match Relation::with_dimensions(DEFAULT_NAME, 1, 1, self.factory.as_ref()) {
            Ok(relation) => {
                if self.relations.insert(relation).is_err() {
                    log::warn!("default relation '{DEFAULT_NAME}' could not be registered");
                }
            }
            Err(err) => log::warn!("default relation could not be created: {err}"),
        }
        if self.graphs.insert(Graph::new(DEFAULT_NAME)).is_err() {
            log::warn!("default graph '{DEFAULT_NAME}' could not be registered");
        }
    }

    #[must_use]
    pub fn namespace(&self) -> SharedNamespace {
        self.namespace.clone()
    }

    #[must_use]
    pub fn compiler(&self) -> Rc<dyn DefinitionCompiler> {
        self.compiler.clone()
    }

    #[must_use]
    pub fn factory(&self) -> Rc<dyn RelationFactory> {
        self.factory.clone()
    }

    #[must_use]
    pub fn default_relation(&self) -> Option<&Relation> {
        self.relations.get_by_name(DEFAULT_NAME)
    }

    #[must_use]
    pub fn default_graph(&self) -> Option<&Graph> {
        self.graphs.get_by_name(DEFAULT_NAME)
    }

    /// The persistence filter: hidden objects and the reserved default
    /// name are skipped by serialization.
    #[must_use]
    pub fn is_persistable<E: Entity>(entity: &E) -> bool {
        !entity.hidden() && entity.name() != DEFAULT_NAME
    }

    /// Names a serializer would write for one manager, sorted.
    #[must_use]
    pub fn persistable_names<E: Entity>(manager: &Manager<E>) -> Vec<String> {
        let mut names: Vec<String> = manager
            .iter()
            .filter(|(_, entity)| Self::is_persistable(*entity))
            .map(|(name, _)| name.to_string())
            .collect();
        names.sort_unstable();
        names
    }
}

impl Default for Workbench {
    fn default() -> Self {
        Self::with_defaults()
    }
}
