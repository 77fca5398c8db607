use http::Uri;

use crate::error::AppError;

/// Works out the absolute URI a request is meant for.
///
/// Absolute-form targets (what clients send to a forward proxy) are returned
/// untouched: no dot-segment removal, case folding or re-encoding. Origin-form
/// targets only make sense with an upstream base; without one the tap would
/// end up calling itself.
pub fn resolve_target(uri: &Uri, upstream: Option<&Uri>) -> Result<Uri, AppError> {
    let unresolvable = || AppError::UnresolvableTarget(uri.to_string());

    if uri.scheme().is_some() && uri.authority().is_some() {
        return Ok(uri.clone());
    }

    // Authority-form (CONNECT) carries no path at all.
    let path_and_query = match uri.path_and_query() {
        Some(pq) if uri.authority().is_none() => pq.as_str(),
        _ => return Err(unresolvable()),
    };

    let base = upstream.ok_or_else(unresolvable)?;
    let (scheme, authority) = match (base.scheme_str(), base.authority()) {
        (Some(scheme), Some(authority)) => (scheme, authority.as_str()),
        _ => return Err(unresolvable()),
    };

    format!(
        "{}://{}{}{}",
        scheme,
        authority,
        base.path().trim_end_matches('/'),
        path_and_query
    )
    .parse()
    .map_err(|_| unresolvable())
}
