//! Natural ("human") string ordering.
//!
//! Runs of ASCII digits compare by numeric value, everything else compares
//! character by character, case-sensitively. `Item2` sorts before `Item10`,
//! and `Zeta` sorts before `alpha`.

use std::cmp::Ordering;

/// Compare two strings in natural order.
///
/// Strings that compare equal naturally but differ in bytes (`a01` vs `a1`)
/// fall back to plain byte order so the result is a total order.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a;
    let mut right = b;

    loop {
        let (Some(l), Some(r)) = (left.chars().next(), right.chars().next()) else {
            return left.len().cmp(&right.len()).then_with(|| a.cmp(b));
        };

        if l.is_ascii_digit() && r.is_ascii_digit() {
            let (l_run, l_rest) = split_digits(left);
            let (r_run, r_rest) = split_digits(right);
            let ord = compare_numeric(l_run, r_run);
            if ord != Ordering::Equal {
                return ord;
            }
            left = l_rest;
            right = r_rest;
            continue;
        }

        match l.cmp(&r) {
            Ordering::Equal => {
                left = &left[l.len_utf8()..];
                right = &right[r.len_utf8()..];
            }
            ord => return ord,
        }
    }
}

/// Stable in-place natural sort.
pub fn natural_sort<T: AsRef<str>>(items: &mut [T]) {
    items.sort_by(|a, b| natural_cmp(a.as_ref(), b.as_ref()));
}

fn split_digits(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(end)
}

fn compare_numeric(a: &str, b: &str) -> Ordering {
    let a_trimmed = a.trim_start_matches('0');
    let b_trimmed = b.trim_start_matches('0');
    a_trimmed
        .len()
        .cmp(&b_trimmed.len())
        .then_with(|| a_trimmed.cmp(b_trimmed))
}
