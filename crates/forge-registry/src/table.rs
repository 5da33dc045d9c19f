//! Markdown table rendering

use std::fmt::Write;

use crate::extract::PublishedImage;

const HEADERS: [&str; 7] = [
    "Tag",
    "Locked Tag",
    "Nuke Version",
    "OS",
    "Upstream Image",
    "Date Added",
    "Image Size (GB)",
];

/// Render the published images as a markdown table, newest Nuke version
/// first, tags alphabetical within a version.
pub fn to_markdown(images: &[PublishedImage]) -> String {
    let mut sorted = images.to_vec();
    sorted.sort_by(|a, b| {
        b.nuke_version
            .cmp(&a.nuke_version)
            .then_with(|| a.tag.cmp(&b.tag))
    });

    let mut table = String::new();
    writeln!(table, "| {} |", HEADERS.join(" | ")).expect("writing to a String cannot fail");
    writeln!(table, "|{}", " --- |".repeat(HEADERS.len())).expect("writing to a String cannot fail");
    for image in &sorted {
        writeln!(
            table,
            "| {} | {} | {} | {} | {} | {} | {:.1} |",
            image.tag,
            image.locked_tag,
            image.nuke_version,
            image.target_os,
            image.upstream_image,
            image.date_added,
            image.size_gb,
        )
        .expect("writing to a String cannot fail");
    }
    table
}
