//! Layout passes.
//!
//! [`resolve`] runs one container's pass as a pure function of its input.
//! [`LayoutTree::layout`] drives it over a box tree: resolve a container,
//! write the result back, recurse into nested containers, and repeat for
//! the configured number of passes so forward sibling references settle.

use glam::IVec2;
use indexmap::IndexMap;
use strut_constraint::{group_by_primary, order_constraints, Constraint};
use strut_core::{Bounds, BoxId, Diagnostic, DiagnosticKind, LayoutError, Severity};
use thiserror::Error;

use crate::arena::PassArena;
use crate::resolver::{apply, Step};
use crate::seeding::seed_preferred_size;
use crate::tree::LayoutTree;

/// Options for layout computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutOptions {
    /// Full passes over the tree. The second pass picks up forward sibling
    /// references and nested calculated sizes.
    pub passes: u32,
    /// Lay out nested containers after their parent
    pub recurse: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            passes: 2,
            recurse: true,
        }
    }
}

impl LayoutOptions {
    pub fn with_passes(mut self, passes: u32) -> Self {
        self.passes = passes;
        self
    }

    pub fn with_recurse(mut self, recurse: bool) -> Self {
        self.recurse = recurse;
        self
    }
}

/// A child box as handed to [`resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxGeometry<'a> {
    pub id: BoxId,
    pub name: Option<&'a str>,
    /// Bounds before the pass
    pub bounds: Bounds,
    pub preferred_size: IVec2,
}

impl<'a> BoxGeometry<'a> {
    pub fn new(id: BoxId, bounds: Bounds, preferred_size: IVec2) -> Self {
        Self {
            id,
            name: None,
            bounds,
            preferred_size,
        }
    }

    pub fn with_name(mut self, name: &'a str) -> Self {
        self.name = Some(name);
        self
    }
}

/// Everything one container pass reads.
#[derive(Debug, Clone, Copy)]
pub struct PassInput<'a> {
    pub container: BoxId,
    pub container_name: Option<&'a str>,
    /// Size of the container's local frame; its origin is (0, 0)
    pub container_size: IVec2,
    /// Direct children, in order
    pub children: &'a [BoxGeometry<'a>],
    /// The container's constraint list, in insertion order
    pub constraints: &'a [Constraint],
}

/// Outcome of one container pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub container: BoxId,
    /// New bounds of every resolved child, in resolution order
    pub bounds: IndexMap<BoxId, Bounds>,
    /// (max x + width, max y + height) over the resolved children
    pub calculated_size: IVec2,
    /// Children without constraints, left out of the pass
    pub excluded: Vec<BoxId>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Resolution {
    fn collect(arena: &PassArena<'_>, order: &[BoxId], excluded: Vec<BoxId>, diagnostics: Vec<Diagnostic>) -> Self {
        let bounds: IndexMap<BoxId, Bounds> = order
            .iter()
            .filter_map(|&id| arena.bounds(id).map(|b| (id, b)))
            .collect();
        let calculated_size = bounds
            .values()
            .fold(IVec2::ZERO, |size, b| size.max(IVec2::new(b.right(), b.bottom())));

        Self {
            container: arena.container(),
            bounds,
            calculated_size,
            excluded,
            diagnostics,
        }
    }

    /// Resolved bounds of one child.
    pub fn bounds_of(&self, id: BoxId) -> Option<Bounds> {
        self.bounds.get(&id).copied()
    }
}

/// A pass stopped by a fatal constraint error.
#[derive(Debug, Clone, Error)]
#[error("layout of {} aborted: {error}", .partial.container)]
pub struct PassAborted {
    #[source]
    pub error: LayoutError,
    /// Boxes resolved before the error, and every diagnostic so far
    pub partial: Resolution,
}

/// Resolve one container's children against its constraint list.
///
/// Boxes are resolved in the order they first appear as a primary, each
/// box's constraints in attribute precedence order. Working bounds are
/// updated as constraints apply, so later constraints see earlier results;
/// references to boxes not yet reached read their pre-pass bounds.
#[tracing::instrument(level = "debug", skip(input), fields(container = %input.container, children = input.children.len()))]
pub fn resolve(input: &PassInput<'_>) -> Result<Resolution, PassAborted> {
    let mut arena = PassArena::new(input);
    let mut diagnostics = Vec::new();

    let groups = group_by_primary(input.constraints);
    let child_ids: Vec<BoxId> = input.children.iter().map(|c| c.id).collect();
    let excluded = groups.unconstrained(&child_ids);
    for &id in &excluded {
        let diagnostic = Diagnostic::new(
            DiagnosticKind::Unconstrained,
            id,
            format!("{} does not have any constraints; it will not be displayed", arena.label(id)),
        );
        tracing::info!("{diagnostic}");
        diagnostics.push(diagnostic);
    }

    let mut order: Vec<BoxId> = Vec::with_capacity(groups.len());
    let mut deferred: Vec<&Constraint> = Vec::new();

    for (id, mut list) in groups.into_groups() {
        if !arena.contains(id) {
            for c in list {
                report(
                    &mut diagnostics,
                    Diagnostic::new(
                        DiagnosticKind::ForeignBox,
                        id,
                        "the constrained box is not a direct child of this container",
                    )
                    .with_constraint(arena.describe(c)),
                );
            }
            continue;
        }

        if let Err(error) = order_constraints(id, &mut list) {
            let mut diagnostic = Diagnostic::new(DiagnosticKind::DuplicateAttribute, id, error.to_string());
            if let LayoutError::DuplicateAttribute { attribute, .. } = &error {
                if let Some(second) = list.iter().filter(|c| c.attribute() == *attribute).nth(1) {
                    diagnostic = diagnostic.with_constraint(arena.describe(second));
                }
            }
            tracing::error!("{diagnostic}");
            diagnostics.push(diagnostic);
            return Err(PassAborted {
                error,
                partial: Resolution::collect(&arena, &order, excluded, diagnostics),
            });
        }

        tracing::debug!(box_id = %id, constraints = list.len(), "resolving box");
        seed_preferred_size(&mut arena, id, &list);
        order.push(id);

        let mut pending = Vec::new();
        for &c in &list {
            match apply(&mut arena, c) {
                Step::Applied => {
                    drain_worklist(&mut arena, &mut pending, &mut diagnostics);
                }
                Step::Deferred => pending.push(c),
                Step::Rejected(diagnostic) => report(&mut diagnostics, diagnostic),
            }
        }
        deferred.append(&mut pending);
    }

    drain_worklist(&mut arena, &mut deferred, &mut diagnostics);
    for c in deferred {
        let source = c.secondary().map(|s| arena.label(s)).unwrap_or_default();
        report(
            &mut diagnostics,
            Diagnostic::new(
                DiagnosticKind::UnresolvedDependency,
                c.primary(),
                format!(
                    "the {} of {source} was never resolved in this pass",
                    c.secondary_attribute()
                ),
            )
            .with_constraint(arena.describe(c)),
        );
    }

    Ok(Resolution::collect(&arena, &order, excluded, diagnostics))
}

/// Retry deferred constraints until a round applies nothing.
fn drain_worklist<'c>(arena: &mut PassArena<'_>, pending: &mut Vec<&'c Constraint>, diagnostics: &mut Vec<Diagnostic>) {
    loop {
        let mut progressed = false;
        let mut waiting = Vec::with_capacity(pending.len());
        for c in pending.drain(..) {
            match apply(arena, c) {
                Step::Applied => progressed = true,
                Step::Deferred => waiting.push(c),
                Step::Rejected(diagnostic) => report(diagnostics, diagnostic),
            }
        }
        *pending = waiting;
        if !progressed || pending.is_empty() {
            break;
        }
    }
}

fn report(diagnostics: &mut Vec<Diagnostic>, diagnostic: Diagnostic) {
    tracing::warn!("{diagnostic}");
    diagnostics.push(diagnostic);
}

/// Result of a tree layout.
#[derive(Debug, Clone, Default)]
pub struct LayoutReport {
    /// Passes run
    pub passes: u32,
    /// Containers laid out in the final pass, in visiting order
    pub containers: Vec<BoxId>,
    /// Diagnostics of the final pass
    pub diagnostics: Vec<Diagnostic>,
}

impl LayoutReport {
    /// Highest severity reported, if any.
    pub fn worst_severity(&self) -> Option<Severity> {
        self.diagnostics.iter().map(Diagnostic::severity).max()
    }

    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.kind == kind)
    }
}

/// A tree layout stopped by an error.
#[derive(Debug, Clone, Error)]
#[error("layout aborted: {error}")]
pub struct LayoutAborted {
    #[source]
    pub error: LayoutError,
    /// The failing pass, with every diagnostic up to and including the
    /// fatal one
    pub report: LayoutReport,
}

impl LayoutTree {
    /// Lay out `container` and, with `options.recurse`, every nested
    /// container below it.
    ///
    /// On a fatal error the bounds resolved before it are kept, and the
    /// error comes back together with the diagnostics reported so far.
    #[tracing::instrument(skip(self, options), fields(passes = options.passes))]
    pub fn layout(&mut self, container: BoxId, options: &LayoutOptions) -> Result<LayoutReport, LayoutAborted> {
        let mut report = LayoutReport::default();
        for pass in 1..=options.passes.max(1) {
            tracing::debug!(pass, "starting layout pass");
            report = LayoutReport {
                passes: pass,
                ..LayoutReport::default()
            };
            if let Err(error) = self.layout_container(container, options, &mut report) {
                return Err(LayoutAborted { error, report });
            }
        }
        Ok(report)
    }

    /// Stretch every root box to `(0, y, width, height - y)` and lay it out.
    ///
    /// This is the top-level window behaviour: roots keep their vertical
    /// offset and fill the rest of the viewport.
    #[tracing::instrument(skip(self, options), fields(passes = options.passes))]
    pub fn layout_viewport(&mut self, width: i32, height: i32, options: &LayoutOptions) -> Result<LayoutReport, LayoutAborted> {
        let mut report = LayoutReport::default();
        for pass in 1..=options.passes.max(1) {
            report = LayoutReport {
                passes: pass,
                ..LayoutReport::default()
            };
            if let Err(error) = self.layout_roots(IVec2::new(width, height), options, &mut report) {
                return Err(LayoutAborted { error, report });
            }
        }
        Ok(report)
    }

    fn layout_roots(&mut self, viewport: IVec2, options: &LayoutOptions, report: &mut LayoutReport) -> Result<(), LayoutError> {
        for root in self.roots.clone() {
            let node = self.nodes.get_mut(&root).ok_or(LayoutError::UnknownBox(root))?;
            let y = node.bounds.y;
            node.bounds = Bounds::new(0, y, viewport.x, viewport.y.saturating_sub(y).max(0));
            if node.is_container() {
                self.layout_container(root, options, report)?;
            }
        }
        Ok(())
    }

    fn layout_container(&mut self, container: BoxId, options: &LayoutOptions, report: &mut LayoutReport) -> Result<(), LayoutError> {
        let outcome = {
            let node = self.nodes.get(&container).ok_or(LayoutError::UnknownBox(container))?;
            let data = node.container_data().ok_or(LayoutError::NotAContainer(container))?;
            let children: Vec<BoxGeometry<'_>> = data
                .children
                .iter()
                .filter_map(|id| self.nodes.get(id))
                .map(|child| BoxGeometry {
                    id: child.id,
                    name: child.name.as_deref(),
                    bounds: child.bounds,
                    preferred_size: child.effective_preferred_size(),
                })
                .collect();
            let input = PassInput {
                container,
                container_name: node.name.as_deref(),
                container_size: node.bounds.size(),
                children: &children,
                constraints: &data.constraints,
            };
            resolve(&input)
        };

        let resolution = match outcome {
            Ok(resolution) => resolution,
            Err(aborted) => {
                tracing::error!("{aborted}");
                self.commit_bounds(&aborted.partial);
                report.diagnostics.extend(aborted.partial.diagnostics);
                return Err(aborted.error);
            }
        };

        self.commit_bounds(&resolution);
        if let Some(data) = self.nodes.get_mut(&container).and_then(|n| n.container_data_mut()) {
            data.calculated_size = resolution.calculated_size;
        }
        report.containers.push(container);
        report.diagnostics.extend(resolution.diagnostics);

        if options.recurse {
            let nested: Vec<BoxId> = self
                .children(container)
                .filter(|child| child.visible && child.is_container())
                .map(|child| child.id)
                .collect();
            for child in nested {
                self.layout_container(child, options, report)?;
            }
        }
        Ok(())
    }

    fn commit_bounds(&mut self, resolution: &Resolution) {
        for (id, bounds) in &resolution.bounds {
            if let Some(node) = self.nodes.get_mut(id) {
                node.bounds = *bounds;
                node.visible = true;
            }
        }
        for id in &resolution.excluded {
            if let Some(node) = self.nodes.get_mut(id) {
                node.visible = false;
            }
        }
    }
}
