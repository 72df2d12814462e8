use crate::commands::{CmdResult, Location, StudyNavPaths};
use crate::config::Backend;
use crate::error::Result;
use crate::model::RecordKind;

/// Where everything lives. The active backend's locations come first.
pub fn run(paths: &StudyNavPaths, backend: Backend) -> Result<CmdResult> {
    let json = vec![
        Location {
            label: "notes (json)",
            path: paths.collection_file(RecordKind::Note),
        },
        Location {
            label: "tasks (json)",
            path: paths.collection_file(RecordKind::Task),
        },
    ];
    let markdown = vec![
        Location {
            label: "notes (markdown)",
            path: paths.vault_subdir(RecordKind::Note),
        },
        Location {
            label: "tasks (markdown)",
            path: paths.vault_subdir(RecordKind::Task),
        },
    ];

    let mut locations = vec![Location {
        label: "data",
        path: paths.data_dir.clone(),
    }];
    match backend {
        Backend::Json => locations.extend(json.into_iter().chain(markdown)),
        Backend::Markdown => locations.extend(markdown.into_iter().chain(json)),
    }
    Ok(CmdResult::default().with_locations(locations))
}
