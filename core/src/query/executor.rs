use std::sync::Arc;

use crate::config::ProcessorConfig;
use crate::error::Result;
use crate::metamodel::Metamodel;
use crate::query::{EntityRequest, PlannedLevel, QueryPlan, QueryPlanner, RowSource};
use crate::result::{LevelRows, ResultTree, build_result_tree};

/// Plans a request, runs every level query against a [`RowSource`] and
/// assembles the result tree.
///
/// The first failing query aborts the whole request; no partial tree is
/// returned.
#[derive(Debug)]
pub struct QueryExecutor<'a, S> {
    metamodel: &'a Metamodel,
    config: ProcessorConfig,
    source: S,
}

impl<'a, S: RowSource> QueryExecutor<'a, S> {
    pub fn new(metamodel: &'a Metamodel, config: ProcessorConfig, source: S) -> Self {
        Self {
            metamodel,
            config,
            source,
        }
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn plan(&self, request: &EntityRequest) -> Result<QueryPlan> {
        QueryPlanner::new(self.metamodel, &self.config).plan(request)
    }

    pub fn execute(&self, request: &EntityRequest) -> Result<ResultTree> {
        crate::relgraph_profile_function!();
        let plan = self.plan(request)?;
        self.execute_plan(plan)
    }

    pub fn execute_plan(&self, plan: QueryPlan) -> Result<ResultTree> {
        let count = match &plan.count {
            Some(query) => Some(self.source.count(&query.render_count(self.config.dialect))?),
            None => None,
        };
        let rows = self.fetch(&plan.root)?;
        build_result_tree(Arc::new(plan.navigation), rows, count)
    }

    fn fetch(&self, level: &PlannedLevel) -> Result<LevelRows> {
        let rendered = level.query.render(self.config.dialect);
        let rows = self.source.fetch(&rendered)?;
        let mut fetched = LevelRows::new(level.level, rows).with_requested(level.requested.clone());
        for child in &level.children {
            fetched = fetched.with_child(self.fetch(child)?);
        }
        Ok(fetched)
    }
}
