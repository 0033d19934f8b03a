//! Attribute resolver.
//!
//! Turns one constraint into a concrete value (`resolved value`) and writes
//! it into the primary box's working bounds. Every outcome is explicit:
//! applied, deferred until a dependency is known, or rejected with a
//! diagnostic.

use strut_constraint::Constraint;
use strut_core::{Anchor, Attribute, Axis, Diagnostic, DiagnosticKind, Relation};

use crate::arena::PassArena;

/// Result of trying to apply one constraint.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Step {
    Applied,
    /// A cross-dimension size coupling whose source is not known yet
    Deferred,
    Rejected(Diagnostic),
}

struct Rejection {
    kind: DiagnosticKind,
    message: String,
}

impl Rejection {
    fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Apply `constraint` to its primary box in `arena`.
pub(crate) fn apply(arena: &mut PassArena<'_>, constraint: &Constraint) -> Step {
    let outcome = match evaluate(arena, constraint) {
        Ok(Some(value)) => commit(arena, constraint, value),
        Ok(None) => return Step::Deferred,
        Err(rejection) => Err(rejection),
    };

    match outcome {
        Ok(()) => Step::Applied,
        Err(Rejection { kind, message }) => Step::Rejected(
            Diagnostic::new(kind, constraint.primary(), message)
                .with_constraint(arena.describe(constraint)),
        ),
    }
}

/// Compute the resolved value, or `None` when the constraint has to wait.
fn evaluate(arena: &PassArena<'_>, c: &Constraint) -> Result<Option<i32>, Rejection> {
    let attribute = c.attribute();
    let axis = attribute.axis();
    let primary = arena.record(c.primary()).ok_or_else(|| {
        Rejection::new(
            DiagnosticKind::ForeignBox,
            "the constrained box is not a direct child of this container",
        )
    })?;

    if !attribute.is_size() {
        if c.secondary().is_none() || c.multiplier == 0.0 {
            return Err(Rejection::new(
                DiagnosticKind::LocationEqualsConstant,
                "a multiplier of 0 or a missing second item together with a location \
                 attribute creates an illegal constraint of a location equal to a constant; \
                 location attributes must be specified in pairs",
            ));
        }
        if c.relation() != Relation::Equal {
            return Err(Rejection::new(
                DiagnosticKind::IllegalRelation,
                format!(".{attribute} can only be constrained with =="),
            ));
        }
    }

    if primary.resolved.count_on(axis) >= 2 {
        return Err(Rejection::new(
            DiagnosticKind::OverConstrained,
            format!(
                "the box already has two of {} resolved",
                axis_attributes(axis)
            ),
        ));
    }

    let preferred = axis.of(primary.preferred);

    let Some(secondary) = c.secondary() else {
        return Ok(Some(c.relation().clamp(c.constant, preferred)));
    };

    let value = if secondary == arena.container() {
        check_pairing(c, false)?;
        let extent = c.secondary_attribute().axis().of(arena.frame());
        scaled(extent, c.secondary_attribute().anchor().fraction(), c.multiplier)
            .saturating_add(c.constant)
    } else {
        check_pairing(c, true)?;
        let source_axis = c.secondary_attribute().axis();
        let target = arena.record(secondary).ok_or_else(|| {
            Rejection::new(
                DiagnosticKind::ForeignBox,
                "the reference box is neither a direct child nor the container",
            )
        })?;

        if attribute.is_size() && source_axis != axis {
            // A seeded size of the box itself is only a starting point
            let known = if secondary == c.primary() {
                target.resolved.determines_extent(source_axis)
            } else {
                arena.extent_known(secondary, source_axis)
            };
            if !known {
                return Ok(None);
            }
        }

        let origin = if attribute.is_size() {
            0
        } else {
            target.bounds.origin(source_axis)
        };
        let offset = scaled(
            target.bounds.extent(source_axis),
            c.secondary_attribute().anchor().fraction(),
            c.multiplier,
        );
        origin.saturating_add(offset).saturating_add(c.constant)
    };

    if attribute.is_size() {
        Ok(Some(c.relation().clamp(value, preferred)))
    } else {
        Ok(Some(value))
    }
}

/// Write a resolved value into the primary box's bounds.
fn commit(arena: &mut PassArena<'_>, c: &Constraint, value: i32) -> Result<(), Rejection> {
    let axis = c.attribute().axis();
    let record = arena.record_mut(c.primary()).ok_or_else(|| {
        Rejection::new(
            DiagnosticKind::ForeignBox,
            "the constrained box is not a direct child of this container",
        )
    })?;

    let resolved = record.resolved;
    let mut bounds = record.bounds;
    let origin = bounds.origin(axis);
    let extent = bounds.extent(axis);
    let end = bounds.end(axis);

    match c.attribute().anchor() {
        Anchor::Start => {
            if resolved.has(axis, Anchor::End) {
                bounds.set_extent(axis, non_negative(axis, end.saturating_sub(value))?);
            }
            bounds.set_origin(axis, value);
        }
        Anchor::End => {
            if resolved.has(axis, Anchor::Start) {
                bounds.set_extent(axis, non_negative(axis, value.saturating_sub(origin))?);
            } else {
                bounds.set_origin(axis, value.saturating_sub(extent));
            }
        }
        Anchor::Size => {
            let size = non_negative(axis, value)?;
            if resolved.has(axis, Anchor::End) && !resolved.has(axis, Anchor::Start) {
                bounds.set_origin(axis, end.saturating_sub(size));
            } else if resolved.has(axis, Anchor::Center) {
                let center = origin.saturating_add(extent / 2);
                bounds.set_origin(axis, center.saturating_sub(size / 2));
            }
            bounds.set_extent(axis, size);
        }
        Anchor::Center => {
            if resolved.has(axis, Anchor::Start) {
                let span = value.saturating_sub(origin).saturating_mul(2);
                bounds.set_extent(axis, non_negative(axis, span)?);
            } else if resolved.has(axis, Anchor::End) {
                let span = non_negative(axis, end.saturating_sub(value).saturating_mul(2))?;
                bounds.set_extent(axis, span);
                bounds.set_origin(axis, end.saturating_sub(span));
            } else {
                bounds.set_origin(axis, value.saturating_sub(extent / 2));
            }
        }
    }

    record.bounds = bounds;
    record.resolved.insert(c.attribute());
    Ok(())
}

/// `trunc(extent × fraction × multiplier)`.
fn scaled(extent: i32, fraction: f64, multiplier: f64) -> i32 {
    (f64::from(extent) * fraction * multiplier) as i32
}

fn non_negative(axis: Axis, span: i32) -> Result<i32, Rejection> {
    if span < 0 {
        let dimension = Attribute::from_parts(axis, Anchor::Size);
        return Err(Rejection::new(
            DiagnosticKind::NegativeExtent,
            format!("the {dimension} would be negative ({span})"),
        ));
    }
    Ok(span)
}

/// Check that the secondary attribute can be related to the primary one.
///
/// Cross-dimension size pairs are only meaningful between boxes of the same
/// scope, never against the container frame.
fn check_pairing(c: &Constraint, allow_cross_size: bool) -> Result<(), Rejection> {
    let (primary, secondary) = (c.attribute(), c.secondary_attribute());
    let valid = if primary.is_size() {
        secondary.is_size() && (allow_cross_size || primary.axis() == secondary.axis())
    } else {
        !secondary.is_size() && primary.axis() == secondary.axis()
    };
    if valid {
        return Ok(());
    }

    let allowed = match primary.axis() {
        _ if primary.is_size() && allow_cross_size => ".width or .height",
        _ if primary.is_size() => primary.name(),
        Axis::Horizontal => ".leading, .centerX, or .trailing",
        Axis::Vertical => ".top, .centerY, or .bottom",
    };
    let allowed = if primary.is_size() && !allow_cross_size {
        format!(".{allowed} of the container")
    } else {
        allowed.to_string()
    };
    Err(Rejection::new(
        DiagnosticKind::InvalidPairing,
        format!(".{primary} can only be constrained to {allowed}"),
    ))
}

fn axis_attributes(axis: Axis) -> &'static str {
    match axis {
        Axis::Horizontal => "leading, trailing, centerX and width",
        Axis::Vertical => "top, bottom, centerY and height",
    }
}
