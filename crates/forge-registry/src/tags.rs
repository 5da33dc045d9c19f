//! Registry tag filtering

use std::collections::BTreeSet;

/// Filter published tags down to the interesting set: per platform
/// prefix (everything before the final `-`), any `latest` tag plus the
/// highest numbered tag.
///
/// Numbered tags compare by descending lexical sort, matching how they
/// are published; equal-sorting distinct tags keep the sort's winner,
/// no further tie-break is applied.
pub fn filter_tags(tags: &[String]) -> Vec<String> {
    let mut kept = BTreeSet::new();

    for tag in tags {
        let Some((platform, suffix)) = tag.rsplit_once('-') else {
            kept.insert(tag.clone());
            continue;
        };
        if suffix == "latest" {
            kept.insert(tag.clone());
            continue;
        }

        let mut numbered: Vec<&String> = tags
            .iter()
            .filter(|candidate| {
                candidate
                    .rsplit_once('-')
                    .is_some_and(|(p, s)| p == platform && s != "latest")
            })
            .collect();
        numbered.sort_unstable_by(|a, b| b.cmp(a));

        if numbered.first().copied() == Some(tag) {
            kept.insert(tag.clone());
        }
    }

    kept.into_iter().collect()
}
