//! Turns an [`EntityRequest`] into one SELECT per navigation level.
//!
//! The root level selects the requested attributes of the root type under
//! their plain aliases. Every expanded level joins the chain of tables from
//! the root down to itself, re-applies the root filter and additionally
//! selects the keys of every ancestor under the ancestor's prefixed key
//! aliases, so its rows can be grouped by the entity that owns them.

use std::sync::Arc;

use compact_str::{CompactString, format_compact};

use crate::builder::{Expression, ExpressionBuilder};
use crate::config::ProcessorConfig;
use crate::error::{Error, Result};
use crate::filter::{LiteralConverter, ROOT_QUALIFIER, Translator, search_expression};
use crate::metamodel::{Attribute, EntityType, Metamodel, NavigationPath};
use crate::query::{EntityRequest, ExpandSpec, JoinKind, SelectQuery, TableRef};
use crate::result::{NavigationId, NavigationTree};
use crate::sql::{SQL, Token};

/// The query of one level and the levels expanded below it.
#[derive(Debug, Clone)]
pub struct PlannedLevel {
    pub level: NavigationId,
    pub query: SelectQuery,
    /// Requested attribute aliases, empty for all
    pub requested: Vec<CompactString>,
    pub children: Vec<PlannedLevel>,
}

impl PlannedLevel {
    /// All levels depth first, starting with this one.
    pub fn walk(&self) -> Vec<&PlannedLevel> {
        let mut levels = vec![self];
        for child in &self.children {
            levels.extend(child.walk());
        }
        levels
    }
}

#[derive(Debug, Clone)]
pub struct QueryPlan {
    pub navigation: NavigationTree,
    pub root: PlannedLevel,
    /// Present when the request asked for `$count`
    pub count: Option<SelectQuery>,
}

/// One table of the join chain from the root to the level being planned.
#[derive(Debug, Clone)]
struct Hop {
    level: NavigationId,
    entity: Arc<EntityType>,
    qualifier: CompactString,
    path: Option<Arc<NavigationPath>>,
}

#[derive(Debug, Clone, Copy)]
pub struct QueryPlanner<'a> {
    metamodel: &'a Metamodel,
    config: &'a ProcessorConfig,
    builder: ExpressionBuilder,
}

impl<'a> QueryPlanner<'a> {
    pub fn new(metamodel: &'a Metamodel, config: &'a ProcessorConfig) -> Self {
        Self {
            metamodel,
            config,
            builder: ExpressionBuilder::from_config(config),
        }
    }

    pub fn plan(&self, request: &EntityRequest) -> Result<QueryPlan> {
        crate::relgraph_profile_scope!("query", "plan");
        let root = Arc::clone(self.metamodel.entity(&request.entity)?);
        let mut navigation = NavigationTree::new(Arc::clone(&root));
        let filter = self.root_filter(&root, request)?;

        let mut query = SelectQuery::new(
            navigation.root().navigation_label(),
            TableRef::new(root.table(), ROOT_QUALIFIER),
        );
        for attribute in selected_attributes(&root, &request.select)? {
            query.column(ROOT_QUALIFIER, attribute.column(), attribute.alias());
        }
        if let Some(filter) = &filter {
            query.filter(filter.clone());
        }
        let count = request.count.then(|| query.clone());

        for order in &request.order_by {
            let attribute = root.resolve_path(&order.path)?;
            query.order_by(SQL::column(ROOT_QUALIFIER, attribute.column()), order.descending);
        }
        for key in root.key_attributes() {
            query.order_by(SQL::column(ROOT_QUALIFIER, key.column()), false);
        }
        query
            .limit(request.top.or(self.config.default_page_size))
            .offset(request.skip);

        let mut chain = vec![Hop {
            level: NavigationId::ROOT,
            entity: root,
            qualifier: CompactString::const_new(ROOT_QUALIFIER),
            path: None,
        }];
        let children = self.plan_children(
            &mut navigation,
            &mut chain,
            filter.as_ref(),
            &request.select,
            &request.expand,
            1,
        )?;

        Ok(QueryPlan {
            navigation,
            root: PlannedLevel {
                level: NavigationId::ROOT,
                query,
                requested: request.select.clone(),
                children,
            },
            count,
        })
    }

    /// `$filter` and `$search` of the root type, ANDed.
    fn root_filter(&self, root: &EntityType, request: &EntityRequest) -> Result<Option<SQL>> {
        let literals = LiteralConverter::new(self.config.case_insensitive_null);
        let filter = match &request.filter {
            Some(node) => Some(
                Translator::new(&self.builder, self.metamodel, root, ROOT_QUALIFIER)
                    .with_literals(literals)
                    .translate(node)?,
            ),
            None => None,
        };
        let search = match &request.search {
            Some(term) => search_expression(&self.builder, root, ROOT_QUALIFIER, term)?,
            None => None,
        };
        let combined: Option<Expression> = match (filter, search) {
            (Some(filter), Some(search)) => Some(self.builder.and(filter, search)),
            (filter, search) => filter.or(search),
        };
        Ok(combined.map(Expression::into_sql))
    }

    fn plan_children(
        &self,
        navigation: &mut NavigationTree,
        chain: &mut Vec<Hop>,
        filter: Option<&SQL>,
        select: &[CompactString],
        expand: &[ExpandSpec],
        depth: usize,
    ) -> Result<Vec<PlannedLevel>> {
        let parent = match chain.last() {
            Some(hop) => Arc::clone(&hop.entity),
            None => return Ok(Vec::new()),
        };
        let mut levels = Vec::with_capacity(expand.len());

        for spec in expand {
            let path = Arc::clone(parent.resolve_navigation(&spec.path)?);
            if depth > self.config.max_expand_depth {
                crate::relgraph_trace_unsupported!(spec.path);
                return Err(Error::unsupported_filter(format_compact!(
                    "$expand depth {depth} at {}",
                    spec.path
                )));
            }
            levels.push(self.plan_level(
                navigation,
                chain,
                filter,
                path,
                &spec.select,
                &spec.expand,
                depth,
            )?);
        }

        // Element collections ride along with their owner unless $select
        // leaves them out.
        for path in parent.navigations().iter().filter(|p| p.is_element_collection()) {
            let expanded = expand.iter().any(|spec| spec.path == path.alias());
            let deselected = !select.is_empty()
                && !select.iter().any(|s| s == "*" || s == path.alias());
            if expanded || deselected {
                continue;
            }
            levels.push(self.plan_level(navigation, chain, filter, Arc::clone(path), &[], &[], depth)?);
        }

        Ok(levels)
    }

    #[allow(clippy::too_many_arguments)]
    fn plan_level(
        &self,
        navigation: &mut NavigationTree,
        chain: &mut Vec<Hop>,
        filter: Option<&SQL>,
        path: Arc<NavigationPath>,
        select: &[CompactString],
        expand: &[ExpandSpec],
        depth: usize,
    ) -> Result<PlannedLevel> {
        let parent = chain.last().map_or(NavigationId::ROOT, |hop| hop.level);
        let target = Arc::clone(self.metamodel.target_of(&path)?);
        let level = navigation.derive_child(parent, Arc::clone(&path), Arc::clone(&target))?;

        let is_collection = path.is_element_collection();
        if is_collection && !expand.is_empty() {
            return Err(Error::unsupported_filter(
                navigation.builder(level).navigation_label(),
            ));
        }

        chain.push(Hop {
            level,
            entity: target,
            qualifier: format_compact!("t{}", chain.len()),
            path: Some(path),
        });
        let query = level_query(navigation, chain, filter, select)?;
        let children = if is_collection {
            Vec::new()
        } else {
            self.plan_children(navigation, chain, filter, select, expand, depth + 1)?
        };
        chain.pop();

        Ok(PlannedLevel {
            level,
            query,
            requested: select.to_vec(),
            children,
        })
    }
}

/// SELECT of the last hop of `chain`.
fn level_query(
    navigation: &NavigationTree,
    chain: &[Hop],
    filter: Option<&SQL>,
    select: &[CompactString],
) -> Result<SelectQuery> {
    let (Some(root), Some(current)) = (chain.first(), chain.last()) else {
        return Err(Error::unsupported_filter("empty navigation chain"));
    };
    let builder = navigation.builder(current.level);
    let mut query = SelectQuery::new(
        builder.navigation_label(),
        TableRef::new(root.entity.table(), root.qualifier.clone()),
    );

    for pair in chain.windows(2) {
        let (owner, hop) = (&pair[0], &pair[1]);
        let Some(path) = &hop.path else { continue };
        if path.join_columns().is_empty() {
            return Err(Error::unsupported_filter(
                navigation.builder(hop.level).navigation_label(),
            ));
        }
        let on = SQL::join(
            path.join_columns().iter().map(|jc| {
                SQL::column(owner.qualifier.clone(), jc.source.clone())
                    .push(Token::EQ)
                    .append(SQL::column(hop.qualifier.clone(), jc.target.clone()))
            }),
            Token::AND,
        );
        query.join(
            JoinKind::Inner,
            TableRef::new(hop.entity.table(), hop.qualifier.clone()),
            on,
        );
    }

    for ancestor in &chain[..chain.len() - 1] {
        let prefixed = navigation.builder(ancestor.level).prefixed_key_aliases();
        for (key, alias) in ancestor.entity.key_attributes().zip(prefixed) {
            query.column(&ancestor.qualifier, key.column(), alias.clone());
            query.order_by(SQL::column(ancestor.qualifier.clone(), key.column()), false);
        }
    }

    for attribute in selected_attributes(&current.entity, select)? {
        query.column(&current.qualifier, attribute.column(), attribute.alias());
    }
    for key in current.entity.key_attributes() {
        query.order_by(SQL::column(current.qualifier.clone(), key.column()), false);
    }

    if let Some(filter) = filter {
        query.filter(filter.clone());
    }
    Ok(query)
}

/// Attributes of `entity` a level selects: all of them for an empty
/// `$select` or `*`, otherwise the keys plus the named attributes, in
/// declaration order. Names may also refer to navigations.
fn selected_attributes<'e>(
    entity: &'e EntityType,
    select: &[CompactString],
) -> Result<Vec<&'e Attribute>> {
    if select.is_empty() || select.iter().any(|s| s == "*") {
        return Ok(entity.attributes().iter().collect());
    }
    for name in select {
        if entity.resolve_navigation(name).is_err() {
            entity.resolve_path(name)?;
        }
    }
    Ok(entity
        .attributes()
        .iter()
        .filter(|a| entity.is_key(a) || select.iter().any(|s| s == a.name()))
        .collect())
}

#[cfg(test)]
mod tests {
    use relgraph_types::{Dialect, PrimitiveKind};

    use super::*;
    use crate::filter::ExpressionNode;

    fn metamodel() -> Metamodel {
        Metamodel::new()
            .with(
                EntityType::entity("Person", "PERSON")
                    .key(Attribute::new("ID", "ID", PrimitiveKind::Int64))
                    .attribute(Attribute::new("Name", "NAME", PrimitiveKind::String).searchable())
                    .navigation(
                        NavigationPath::association("Roles", "Person", "Role", true)
                            .join("ID", "PERSON_ID"),
                    )
                    .navigation(
                        NavigationPath::element_collection("Phones", "Person", "Phone")
                            .join("ID", "PERSON_ID"),
                    ),
            )
            .with(
                EntityType::entity("Role", "ROLE")
                    .key(Attribute::new("PersonID", "PERSON_ID", PrimitiveKind::Int64))
                    .key(Attribute::new("Name", "ROLE_NAME", PrimitiveKind::String))
                    .navigation(
                        NavigationPath::association("Owner", "Role", "Person", false)
                            .join("PERSON_ID", "ID"),
                    ),
            )
            .with(
                EntityType::complex("Phone", "PHONE")
                    .attribute(Attribute::new("Number", "NUMBER", PrimitiveKind::String)),
            )
    }

    #[test]
    fn test_root_query_applies_filter_order_and_default_page() {
        let metamodel = metamodel();
        let config = ProcessorConfig::default().with_default_page_size(50);
        let request = EntityRequest::new("Person")
            .filter(ExpressionNode::equals(
                ExpressionNode::member("Name"),
                ExpressionNode::string("Ada"),
            ))
            .select(["Name"])
            .skip(5)
            .with_count();
        let plan = QueryPlanner::new(&metamodel, &config).plan(&request).unwrap();

        let rendered = plan.root.query.render(Dialect::Default);
        assert_eq!(
            rendered.sql,
            r#"SELECT "t0"."ID" AS "ID", "t0"."NAME" AS "Name" FROM "PERSON" AS "t0" WHERE "t0"."NAME" = ? ORDER BY "t0"."ID" ASC LIMIT 50 OFFSET 5"#
        );
        assert!(plan.count.is_some());
        // $select without Phones leaves the element collection out
        assert!(plan.root.children.is_empty());
    }

    #[test]
    fn test_expand_level_selects_prefixed_ancestor_keys() {
        let metamodel = metamodel();
        let config = ProcessorConfig::default();
        let request = EntityRequest::new("Person").expand(ExpandSpec::new("Roles"));
        let plan = QueryPlanner::new(&metamodel, &config).plan(&request).unwrap();

        assert_eq!(plan.root.children.len(), 2);
        let roles = &plan.root.children[0];
        assert_eq!(roles.query.label(), "Person#Roles->Role");
        let aliases: Vec<_> = roles.query.aliases().collect();
        assert_eq!(aliases, ["k1ID", "PersonID", "Name"]);
        let sql = roles.query.to_sql(Dialect::Default).sql(Dialect::Default);
        assert!(
            sql.contains(r#"INNER JOIN "ROLE" AS "t1" ON "t0"."ID" = "t1"."PERSON_ID""#),
            "{sql}"
        );

        let phones = &plan.root.children[1];
        assert_eq!(phones.query.label(), "Person#Phones->Phone");
    }

    #[test]
    fn test_expand_depth_limit() {
        let metamodel = metamodel();
        let config = ProcessorConfig::default().with_max_expand_depth(1);
        let request = EntityRequest::new("Person")
            .expand(ExpandSpec::new("Roles").expand(ExpandSpec::new("Owner")));
        let err = QueryPlanner::new(&metamodel, &config).plan(&request).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFilter { .. }));
        assert_eq!(err.status().code(), 400);

        let request = EntityRequest::new("Person").expand(ExpandSpec::new("Roles"));
        assert!(QueryPlanner::new(&metamodel, &config).plan(&request).is_ok());
    }

    #[test]
    fn test_unknown_select_is_rejected() {
        let metamodel = metamodel();
        let config = ProcessorConfig::default();
        let request = EntityRequest::new("Person").select(["Nope"]);
        let err = QueryPlanner::new(&metamodel, &config).plan(&request).unwrap_err();
        assert!(matches!(err, Error::UnknownAttribute { .. }));
    }
}
