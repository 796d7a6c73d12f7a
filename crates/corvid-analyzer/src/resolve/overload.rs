//! Overload scoring (spec §4.6, "Overload resolution").

use corvid_ast::decl::FunctionDecl;
use corvid_ast::ids::TypeId;
use corvid_ast::types::TypeExprKind;

use crate::types::TypeRegistry;

/// Marks, per declared parameter, whether its type expression is a bare
/// reference to one of `f`'s own generic type parameters (e.g. the `T` in
/// `func identity<T>(x: T) -> T`) — the positions `score_overload` should
/// cost 1 rather than compare structurally.
#[must_use]
pub fn generic_param_mask(f: &FunctionDecl) -> Vec<bool> {
    f.params
        .iter()
        .map(|p| match &p.type_expr.kind {
            TypeExprKind::Named { path, type_args } => {
                type_args.is_empty() && path.len() == 1 && f.type_params.contains(&path[0])
            }
            _ => false,
        })
        .collect()
}

/// Scores one candidate function against a call's argument list. Returns
/// `None` for an arity mismatch (accounting for a varargs spread: extra
/// trailing arguments are always accepted and don't affect the score).
/// Each fixed parameter costs 0 for an exact match, 1 when that
/// parameter position is a generic parameter being bound (`generic_params`
/// marks which ones are), and 2 for any conversion reached through
/// `can_convert_implicit`, constant or not; anything else disqualifies
/// the candidate. A candidate reached only through a non-local lookup
/// (not declared in the caller's own file) is penalized by `2*n + 1` so
/// an equally-well-typed local candidate always wins first.
#[must_use]
pub fn score_overload(
    registry: &TypeRegistry,
    params: &[TypeId],
    generic_params: &[bool],
    varargs: bool,
    args: &[(TypeId, bool)],
    is_local: bool,
) -> Option<u32> {
    if varargs {
        if args.len() < params.len() {
            return None;
        }
    } else if args.len() != params.len() {
        return None;
    }

    let mut total = 0u32;
    for (i, (param, (arg_ty, arg_is_constant))) in params.iter().zip(args).enumerate() {
        if generic_params.get(i).copied().unwrap_or(false) {
            total += 1;
            continue;
        }
        if registry.compare_types(*param, *arg_ty) {
            continue;
        }
        if !registry.can_convert_implicit(*arg_ty, *param, *arg_is_constant) {
            return None;
        }
        total += 2;
    }

    if !is_local {
        total += 2 * u32::try_from(args.len()).unwrap_or(u32::MAX) + 1;
    }
    Some(total)
}

/// Picks the minimum-score candidate from a scored list. `Ok(None)` means
/// no candidate matched at all; `Err(())` means two or more candidates
/// tied for the lowest score (ambiguous).
#[must_use]
pub fn pick_overload<T: Copy>(scored: &[(T, u32)]) -> Result<Option<T>, ()> {
    let Some(&(_, best)) = scored.iter().min_by_key(|(_, s)| *s) else { return Ok(None) };
    let winners: Vec<T> = scored.iter().filter(|(_, s)| *s == best).map(|(c, _)| *c).collect();
    match winners.len() {
        0 => Ok(None),
        1 => Ok(Some(winners[0])),
        _ => Err(()),
    }
}
