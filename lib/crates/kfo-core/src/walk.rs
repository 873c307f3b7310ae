//! Recursive traversal of a fragment.
//!
//! Order is pre-order, parent before children, siblings in sequence. The
//! children of a node are read after its visitor returns, so anything the
//! visitor inserted under the current node is visited in the same walk.
//! The first error stops the walk; mutations already made are kept.

use crate::directive::{Directive, Fragment};

/// Applies `visit` to every directive in `fragment`, allowing mutation.
pub fn apply_recursively<C, E, F>(
    fragment: &mut Fragment,
    ctx: &mut C,
    mut visit: F,
) -> Result<(), E>
where
    C: ?Sized,
    F: FnMut(&mut Directive, &mut C) -> Result<(), E>,
{
    apply_dyn(fragment, ctx, &mut visit)
}

/// Read-only counterpart of [`apply_recursively`], same order.
pub fn visit_recursively<C, E, F>(fragment: &Fragment, ctx: &mut C, mut visit: F) -> Result<(), E>
where
    C: ?Sized,
    F: FnMut(&Directive, &mut C) -> Result<(), E>,
{
    visit_dyn(fragment, ctx, &mut visit)
}

fn apply_dyn<C: ?Sized, E>(
    fragment: &mut Fragment,
    ctx: &mut C,
    visit: &mut dyn FnMut(&mut Directive, &mut C) -> Result<(), E>,
) -> Result<(), E> {
    for dir in fragment.iter_mut() {
        visit(dir, ctx)?;
        apply_dyn(&mut dir.nested, ctx, visit)?;
    }
    Ok(())
}

fn visit_dyn<C: ?Sized, E>(
    fragment: &Fragment,
    ctx: &mut C,
    visit: &mut dyn FnMut(&Directive, &mut C) -> Result<(), E>,
) -> Result<(), E> {
    for dir in fragment {
        visit(dir, ctx)?;
        visit_dyn(&dir.nested, ctx, visit)?;
    }
    Ok(())
}
