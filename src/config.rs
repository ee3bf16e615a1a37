use std::path::Path;

use anyhow::anyhow;
use config::{Config, File};
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Folder, next to the referencing document, assumed to hold embedded images that are not in the tree
    pub attachments_folder: String,
    pub image_embeds: bool,
    pub wiki_links: bool,
    /// Only effective when a project root is known
    pub absolute_paths: bool,
    pub relative_paths: bool,
    pub inline_code_links: bool,
    /// Skip dot-prefixed entries when reading a tree from disk
    pub ignore_hidden: bool,
}

impl Settings {
    pub fn new(root_dir: &Path) -> anyhow::Result<Settings> {
        let expanded = shellexpand::tilde("~/.config/maestro/links");
        let settings = Config::builder()
            .add_source(File::with_name(&expanded).required(false))
            .add_source(
                File::with_name(&format!(
                    "{}/.maestro-links",
                    root_dir
                        .to_str()
                        .ok_or(anyhow!("Can't convert root_dir to str"))?
                ))
                .required(false),
            )
            .set_default("attachments_folder", "_attachments")?
            .set_default("image_embeds", true)?
            .set_default("wiki_links", true)?
            .set_default("absolute_paths", true)?
            .set_default("relative_paths", true)?
            .set_default("inline_code_links", true)?
            .set_default("ignore_hidden", true)?
            .build()
            .map_err(|err| anyhow!("Build err: {err}"))?;

        let settings = settings.try_deserialize::<Settings>()?;

        anyhow::Ok(settings)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            attachments_folder: "_attachments".to_string(),
            image_embeds: true,
            wiki_links: true,
            absolute_paths: true,
            relative_paths: true,
            inline_code_links: true,
            ignore_hidden: true,
        }
    }
}
