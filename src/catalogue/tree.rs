//! Catalogue tree assembly from flat heading candidates.

use super::numbering::{
    dominant_format, normalize_title, split_normalized, starts_with_number, to_order_key,
};
use super::CatalogueOptions;
use crate::model::{BBox, CatalogueItem};
use std::collections::{HashMap, HashSet};

/// A heading as collected by an adapter, in display order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeadingCandidate {
    /// Heading text
    pub title: String,

    /// Location of the heading
    pub bbox: Option<BBox>,

    /// Number declared by the source (TEI `head/@n`), if any
    pub declared_number: Option<String>,

    /// Lone trailing sentence of the previous section, if any
    pub trailing_sentence: Option<TrailingSentence>,
}

impl HeadingCandidate {
    /// Create a candidate from heading text.
    pub fn new(title: impl Into<String>, bbox: Option<BBox>) -> Self {
        Self {
            title: title.into(),
            bbox,
            ..Default::default()
        }
    }

    /// Set the number declared by the source.
    pub fn with_declared_number(mut self, number: impl Into<String>) -> Self {
        self.declared_number = Some(number.into());
        self
    }

    /// Attach the previous section's lone trailing sentence.
    pub fn with_trailing_sentence(mut self, sentence: TrailingSentence) -> Self {
        self.trailing_sentence = Some(sentence);
        self
    }
}

/// A sentence that may be promoted to a missing parent heading.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrailingSentence {
    /// Sentence text
    pub text: String,

    /// Location of the sentence
    pub bbox: Option<BBox>,

    /// Caller-side handle reported back when the sentence is consumed
    pub source: usize,
}

/// Result of catalogue reconstruction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogueBuild {
    /// Catalogue forest
    pub items: Vec<CatalogueItem>,

    /// Handles of trailing sentences promoted to headings
    pub consumed: Vec<usize>,
}

#[derive(Debug)]
struct Entry {
    title: String,
    formatted_title: String,
    key: String,
    level: usize,
    bbox: Option<BBox>,
    position: usize,
}

/// Build the catalogue forest from headings in display order.
pub fn build_catalogue(
    candidates: &[HeadingCandidate],
    options: &CatalogueOptions,
) -> CatalogueBuild {
    let entries = resolve(candidates, options);
    if entries.is_empty() {
        if options.no_rule_fallback && !candidates.is_empty() {
            log::debug!(
                "No numbered headings among {} candidates, using flat catalogue",
                candidates.len()
            );
            return CatalogueBuild {
                items: flat_catalogue(candidates),
                consumed: Vec::new(),
            };
        }
        return CatalogueBuild::default();
    }

    let (mut entries, consumed) = if options.repair_skipped_levels {
        repair_skipped_levels(entries, candidates)
    } else {
        (entries, Vec::new())
    };
    entries.sort_by_key(|e| e.position);

    CatalogueBuild {
        items: assemble(entries),
        consumed,
    }
}

fn resolve(candidates: &[HeadingCandidate], options: &CatalogueOptions) -> Vec<Entry> {
    let preferred = dominant_format(
        candidates
            .iter()
            .filter(|c| c.declared_number.is_none())
            .map(|c| c.title.trim()),
        options,
    );

    let mut entries: Vec<Entry> = Vec::new();
    for (position, candidate) in candidates.iter().enumerate() {
        let title = candidate.title.trim();
        let (title, key, level) = match &candidate.declared_number {
            Some(number) => {
                let number = number.trim().trim_end_matches('.');
                if number.is_empty() {
                    continue;
                }
                let title = if starts_with_number(title, number) {
                    title.to_string()
                } else if title.is_empty() {
                    number.to_string()
                } else {
                    format!("{} {}", number, title)
                };
                (title, number.to_string(), number.split('.').count())
            }
            None => {
                let Some((key, level)) = to_order_key(title, preferred) else {
                    log::debug!("Heading {:?} has no recognizable number", title);
                    continue;
                };
                let key = qualify_key(key, level, entries.last().map(|e| e.key.as_str()));
                (title.to_string(), key, level)
            }
        };

        entries.push(Entry {
            formatted_title: normalize_title(&title),
            title,
            key,
            level,
            bbox: candidate.bbox,
            position,
        });
    }
    entries
}

/// Prefix a key that is shallower than its level with the previous key.
///
/// Bracketed Chinese sub-headings (`（二）`) carry only their own number;
/// `（二）` after `1.1` becomes `1.2`.
fn qualify_key(key: String, level: usize, previous: Option<&str>) -> String {
    let depth = key.split('.').count();
    let Some(previous) = previous else {
        return key;
    };
    let missing = level.saturating_sub(depth);
    let prefix: Vec<&str> = previous.split('.').take(missing).collect();
    if missing == 0 || prefix.len() < missing {
        return key;
    }
    format!("{}.{}", prefix.join("."), key)
}

fn first_segment(key: &str) -> &str {
    key.split('.').next().unwrap_or(key)
}

/// Insert a level-1 parent before headings whose top-level number was skipped.
fn repair_skipped_levels(
    entries: Vec<Entry>,
    candidates: &[HeadingCandidate],
) -> (Vec<Entry>, Vec<usize>) {
    let mut repaired = Vec::with_capacity(entries.len());
    let mut consumed = Vec::new();
    let mut seen_roots: HashSet<String> = HashSet::new();
    let mut previous_root: Option<String> = None;

    for entry in entries {
        let root = first_segment(&entry.key).to_string();
        let skipped = entry.level > 1
            && previous_root.as_deref().is_some_and(|prev| prev != root)
            && !seen_roots.contains(&root);

        if skipped {
            log::debug!(
                "Heading {:?} skips level 1, inserting parent {}",
                entry.title,
                root
            );
            let trailing = candidates[entry.position].trailing_sentence.as_ref();
            repaired.push(synthetic_parent(&entry, &root, trailing));
            if let Some(sentence) = trailing {
                consumed.push(sentence.source);
            }
        }

        seen_roots.insert(root.clone());
        previous_root = Some(root);
        repaired.push(entry);
    }

    (repaired, consumed)
}

fn synthetic_parent(entry: &Entry, root: &str, trailing: Option<&TrailingSentence>) -> Entry {
    let (title, bbox) = match trailing {
        Some(sentence) => {
            let text = sentence.text.trim();
            let title = if text.is_empty() {
                root.to_string()
            } else if starts_with_number(text, root) {
                text.to_string()
            } else {
                format!("{} {}", root, text)
            };
            (title, sentence.bbox)
        }
        None => (entry.title.clone(), entry.bbox),
    };

    let formatted_title = match trailing {
        Some(_) => normalize_title(&title),
        None => {
            let (_, text) = split_normalized(&entry.formatted_title);
            normalize_title(&format!("{} {}", root, text))
        }
    };

    Entry {
        title,
        formatted_title,
        key: root.to_string(),
        level: 1,
        bbox,
        position: entry.position,
    }
}

/// Attach each entry to the most recent entry holding its parent key.
fn assemble(entries: Vec<Entry>) -> Vec<CatalogueItem> {
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); entries.len()];
    let mut roots = Vec::new();
    let mut by_key: HashMap<String, usize> = HashMap::new();

    for (index, entry) in entries.iter().enumerate() {
        let parent = entry
            .key
            .rsplit_once('.')
            .map(|(parent_key, _)| parent_key);

        match parent.and_then(|p| by_key.get(p)) {
            Some(&parent_index) => children[parent_index].push(index),
            None => {
                if let Some(parent_key) = parent {
                    log::warn!(
                        "Catalogue parent {} of {:?} not found, promoting to root",
                        parent_key,
                        entry.title
                    );
                }
                roots.push(index);
            }
        }
        by_key.insert(entry.key.clone(), index);
    }

    let mut built: Vec<Option<CatalogueItem>> = entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            Some(CatalogueItem {
                title: entry.title,
                formatted_title: entry.formatted_title,
                title_order: entry.key,
                level: entry.level.to_string(),
                order: index + 1,
                bbox: entry.bbox,
                child: Vec::new(),
            })
        })
        .collect();

    // Children always follow their parent, so completing nodes from the
    // back finishes every subtree before its parent takes it.
    for index in (0..built.len()).rev() {
        let subtree: Vec<CatalogueItem> = children[index]
            .iter()
            .filter_map(|&c| built[c].take())
            .collect();
        if let Some(item) = built[index].as_mut() {
            item.child = subtree;
        }
    }

    roots.into_iter().filter_map(|r| built[r].take()).collect()
}

/// Flat level-1 list for documents without numbered headings.
///
/// The first candidate is dropped: it is the document title.
fn flat_catalogue(candidates: &[HeadingCandidate]) -> Vec<CatalogueItem> {
    candidates
        .iter()
        .skip(1)
        .enumerate()
        .map(|(i, candidate)| {
            let title = candidate.title.trim().to_string();
            CatalogueItem {
                formatted_title: normalize_title(&title),
                title,
                title_order: (i + 1).to_string(),
                level: "1".to_string(),
                order: i + 1,
                bbox: candidate.bbox,
                child: Vec::new(),
            }
        })
        .collect()
}
