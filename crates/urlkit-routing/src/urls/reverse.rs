//! Reverse URL generation from route patterns.
//!
//! This module provides [`substitute`], which turns a route pattern and a
//! [`RouteRef`] into a concrete path.

use urlkit_core::{UrlError, UrlResult};

use super::pattern::{place, raw_regex, Placed, ReversedPaths, Token};
use crate::target::RouteRef;

/// Substitutes the values of `params` into `pattern`.
///
/// Placeholders are visited left to right:
///
/// - `{name}` / `{name:regex}` take the named parameter `name`.
/// - `(regex)` groups and `/:shorthand` tokens take the named parameter that
///   `reversed_paths` records at their capture position.
///
/// Either kind falls back to the positional parameter with the
/// placeholder's index (0-based, counting placeholders only). Everything
/// else, regex delimiters included, is copied verbatim.
///
/// # Examples
///
/// ```
/// use urlkit_routing::urls::pattern::ReversedPaths;
/// use urlkit_routing::urls::reverse::substitute;
/// use urlkit_routing::RouteRef;
///
/// let paths = ReversedPaths::from_names([("year", 1), ("title", 2)]);
/// let post = RouteRef::named("blog-post").param("year", "2012").param("title", "x");
/// let path = substitute("/blog/{year}/{title}", &paths, &post).unwrap();
/// assert_eq!(path, "/blog/2012/x");
/// ```
///
/// # Errors
///
/// Returns [`UrlError::MissingParameter`] if a placeholder has no value, and
/// [`UrlError::ImproperlyConfigured`] if the pattern is malformed or is a raw
/// `#...#` regex, which has no template to fill.
pub fn substitute(
    pattern: &str,
    reversed_paths: &ReversedPaths,
    params: &RouteRef,
) -> UrlResult<String> {
    if raw_regex(pattern).is_some() {
        return Err(UrlError::ImproperlyConfigured(format!(
            "Raw regex route '{pattern}' cannot be reversed; give the route a custom URL builder"
        )));
    }

    let mut result = String::with_capacity(pattern.len());
    let mut index = 0;

    for Placed { token, position } in place(pattern)? {
        let Some(position) = position else {
            if let Token::Literal(text) | Token::Verbatim(text) = token {
                result.push_str(text);
            }
            continue;
        };
        let value = match token {
            Token::Named { name, .. } => params
                .get(name)
                .or_else(|| params.positional(index))
                .ok_or_else(|| missing(params, name))?,
            Token::Group(_) => lookup_position(reversed_paths, params, position, index)
                .ok_or_else(|| missing(params, &placeholder_label(reversed_paths, position)))?,
            Token::Shorthand(shorthand) => {
                match lookup_position(reversed_paths, params, position, index) {
                    Some(value) => value,
                    None if shorthand.is_optional() => "",
                    None => {
                        let label = reversed_paths
                            .name_at(position)
                            .map_or_else(|| shorthand.to_string(), String::from);
                        return Err(missing(params, &label));
                    }
                }
            }
            Token::Literal(_) | Token::Verbatim(_) => "",
        };
        result.push_str(value);
        index += 1;
    }

    Ok(result)
}

/// Looks up the value for an anonymous placeholder at `position`.
fn lookup_position<'a>(
    reversed_paths: &ReversedPaths,
    params: &'a RouteRef,
    position: usize,
    index: usize,
) -> Option<&'a str> {
    reversed_paths
        .name_at(position)
        .and_then(|name| params.get(name))
        .or_else(|| params.positional(index))
}

fn placeholder_label(reversed_paths: &ReversedPaths, position: usize) -> String {
    reversed_paths
        .name_at(position)
        .map_or_else(|| format!("#{position}"), String::from)
}

fn missing(params: &RouteRef, parameter: &str) -> UrlError {
    UrlError::MissingParameter {
        route: params.name().unwrap_or_default().to_string(),
        parameter: parameter.to_string(),
    }
}
