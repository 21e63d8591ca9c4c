// std
use std::cmp::Ordering;

/// Locale-independent natural-order comparison.
///
/// Runs of ASCII digits compare by numeric value (`p2 < p10`); every other byte compares by value.
/// Numerically equal runs such as `01` and `1` compare equal, so a stable sort keeps their
/// original order.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
	let (a, b) = (a.as_bytes(), b.as_bytes());
	let (mut i, mut j) = (0, 0);

	while i < a.len() && j < b.len() {
		if a[i].is_ascii_digit() && b[j].is_ascii_digit() {
			let (a_end, b_end) = (digit_run_end(a, i), digit_run_end(b, j));
			let (a_num, b_num) = (trim_leading_zeros(&a[i..a_end]), trim_leading_zeros(&b[j..b_end]));
			let ord = a_num.len().cmp(&b_num.len()).then_with(|| a_num.cmp(b_num));

			if ord != Ordering::Equal {
				return ord;
			}

			i = a_end;
			j = b_end;

			continue;
		}

		match a[i].cmp(&b[j]) {
			Ordering::Equal => {
				i += 1;
				j += 1;
			},
			ord => return ord,
		}
	}

	(a.len() - i).cmp(&(b.len() - j))
}

fn digit_run_end(bytes: &[u8], start: usize) -> usize {
	bytes[start..].iter().position(|b| !b.is_ascii_digit()).map_or(bytes.len(), |p| start + p)
}

fn trim_leading_zeros(digits: &[u8]) -> &[u8] {
	let first = digits.iter().position(|&d| d != b'0').unwrap_or(digits.len());

	&digits[first..]
}

/// Stable natural-order sort of key/value pairs by key.
pub fn sort_pairs_naturally(pairs: &mut [(String, String)]) {
	pairs.sort_by(|(a, _), (b, _)| natural_cmp(a, b));
}
