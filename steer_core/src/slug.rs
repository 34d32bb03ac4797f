/// Convert a heading title into its anchor slug.
///
/// ASCII letters are lowercased and ASCII digits are kept. Runs of spaces and
/// underscores become a single `-`, never at the start or end of the slug.
/// Every other character is dropped without leaving a separator behind, so
/// `"Don't Panic"` becomes `"dont-panic"` and `"my-section"` becomes
/// `"mysection"`.
///
/// ```
/// use steer_core::slugify;
///
/// assert_eq!(slugify("My  Section"), "my-section");
/// assert_eq!(slugify("__init__ hooks"), "init-hooks");
/// assert_eq!(slugify("Step 1: Setup!"), "step-1-setup");
/// ```
pub fn slugify(title: &str) -> String {
	let mut slug = String::with_capacity(title.len());
	let mut pending_separator = false;

	for ch in title.chars() {
		match ch {
			'a'..='z' | '0'..='9' => {
				push_pending(&mut slug, &mut pending_separator);
				slug.push(ch);
			}
			'A'..='Z' => {
				push_pending(&mut slug, &mut pending_separator);
				slug.push(ch.to_ascii_lowercase());
			}
			' ' | '_' => pending_separator = true,
			_ => {}
		}
	}

	slug
}

fn push_pending(slug: &mut String, pending_separator: &mut bool) {
	if *pending_separator && !slug.is_empty() {
		slug.push('-');
	}
	*pending_separator = false;
}
