//! Display titles derived from file and folder names.
//!
//! Documents carry no mandatory title metadata, so every label shown in the
//! sidebar or a section header comes from the filesystem:
//!
//! - `getting_started.md` → "Getting Started" (navigation label)
//! - `guide/quick-setup.md` → "Guide / Quick Setup" (section title)
//! - `api_reference/` → "Api Reference" (folder label)
//!
//! Underscores and hyphens both become spaces, then every word is title-cased:
//! a letter following another letter is lowercased, any other letter is
//! uppercased. A digit counts as a word break, so `2nd-pass` becomes "2Nd Pass".

/// Convert a raw file stem or folder name into a display title.
pub fn display_title(name: &str) -> String {
    title_case(&name.replace(['_', '-'], " "))
}

/// Title-case every word: uppercase a letter after a non-letter, lowercase otherwise.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_letter = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_letter = true;
        } else {
            out.push(c);
            prev_letter = false;
        }
    }
    out
}

/// File stem of a `/`-separated relative path (`guide/setup.md` → `setup`).
pub fn file_stem(rel_path: &str) -> &str {
    let name = file_name(rel_path);
    match name.rfind('.') {
        Some(0) | None => name,
        Some(dot) => &name[..dot],
    }
}

/// Final segment of a `/`-separated relative path.
pub fn file_name(rel_path: &str) -> &str {
    rel_path.rsplit('/').next().unwrap_or(rel_path)
}

/// Label used for a document in the navigation tree.
pub fn nav_label(rel_path: &str) -> String {
    display_title(file_stem(rel_path))
}

/// Title shown above a document's section.
///
/// Root-level documents use their own name; nested documents are prefixed
/// with their immediate folder: `guide/setup.md` → "Guide / Setup".
pub fn section_title(rel_path: &str) -> String {
    let file = nav_label(rel_path);
    match rel_path.rsplit_once('/') {
        Some((parent, _)) => {
            let folder = parent.rsplit('/').next().unwrap_or(parent);
            format!("{} / {}", display_title(folder), file)
        }
        None => file,
    }
}
