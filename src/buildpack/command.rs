//! Buildpack commands: fetch the app's list, resolve the requested
//! buildpack, compute the new list, persist it and report the result.
//!
//! Every step completes before the next one starts and the only write is a
//! single full-list replace, so any failure leaves the app untouched.

use crate::buildpack::list::{
    BuildpackEntry, BuildpackList, Operation, mutate, validate_index,
};
use crate::buildpack::resolver::{Resolver, url_to_display_name};
use crate::error::BuildpackError;
use crate::git::push_command;
use crate::output::{self, Ui};
use crate::platform::{App, BuildpackInstallation, ConfigVars, PlatformApi};
use crate::registry::RegistryLookup;

const URN_PREFIX: &str = "urn:buildpack:";
const IMAGE_GENERATION: &str = "fir";

/// Config vars that override automatic buildpack detection, in precedence order.
const LEGACY_OVERRIDES: [&str; 2] = ["BUILDPACK_URL", "LANGUAGE_PACK_URL"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppKind {
    /// Buildpacks live in the app's buildpack installations.
    Classic,
    /// Buildpacks are read from the newest release's OCI image.
    ImageBased,
}

impl AppKind {
    pub fn of(app: &App) -> Self {
        match app.generation_name() {
            Some(IMAGE_GENERATION) => AppKind::ImageBased,
            _ => AppKind::Classic,
        }
    }
}

pub struct BuildpackCommand<'a> {
    api: &'a dyn PlatformApi,
    resolver: Resolver<'a>,
}

impl<'a> BuildpackCommand<'a> {
    pub fn new(api: &'a dyn PlatformApi, registry: &'a dyn RegistryLookup) -> Self {
        Self {
            api,
            resolver: Resolver::new(registry),
        }
    }

    pub fn app_kind(&self, app: &str) -> Result<AppKind, BuildpackError> {
        Ok(AppKind::of(&self.api.app(app)?))
    }

    /// The app's current buildpacks, with `urn:buildpack:` prefixes removed.
    pub fn fetch(&self, app: &str, kind: AppKind) -> Result<BuildpackList, BuildpackError> {
        let entries = match kind {
            AppKind::Classic => self
                .api
                .buildpack_installations(app)?
                .into_iter()
                .map(BuildpackEntry::from)
                .collect(),
            AppKind::ImageBased => self.image_entries(app)?,
        };
        Ok(BuildpackList::from_entries(strip_urns(entries)))
    }

    fn image_entries(&self, app: &str) -> Result<Vec<BuildpackEntry>, BuildpackError> {
        let releases = self.api.latest_releases(app)?;
        let Some(image) = releases.first().and_then(|release| release.oci_image.as_ref()) else {
            return Ok(Vec::new());
        };

        let images = self.api.oci_image(app, &image.id)?;
        let Some(image) = images.into_iter().next() else {
            return Ok(Vec::new());
        };

        Ok(image
            .buildpacks
            .into_iter()
            .filter_map(|buildpack| {
                let url = buildpack.id.clone().or(buildpack.homepage)?;
                Some((url, buildpack.id))
            })
            .enumerate()
            .map(|(ordinal, (url, name))| BuildpackEntry { url, name, ordinal })
            .collect())
    }

    /// Replace the app's buildpacks with `list` and return what the server confirmed.
    pub fn apply(&self, app: &str, list: &BuildpackList) -> Result<BuildpackList, BuildpackError> {
        let confirmed = self
            .api
            .replace_buildpack_installations(app, &list.updates())?;
        tracing::info!(app, count = confirmed.len(), "buildpack list replaced");
        Ok(from_installations(confirmed))
    }

    /// The list mutations start from, read the way the app's kind stores it.
    fn current(&self, app: &str) -> Result<BuildpackList, BuildpackError> {
        let kind = self.app_kind(app)?;
        self.fetch(app, kind)
    }

    pub fn list(&self, app: &str, ui: &mut dyn Ui) -> Result<BuildpackList, BuildpackError> {
        let kind = self.app_kind(app)?;
        let list = self.fetch(app, kind)?;

        if list.is_empty() {
            ui.log(&format!("{app} has no Buildpacks."));
            return Ok(list);
        }

        let noun = match kind {
            AppKind::Classic => "Buildpack",
            AppKind::ImageBased => "Cloud Native Buildpack",
        };
        let urls = if list.len() > 1 { "URLs" } else { "URL" };
        ui.log(&output::header(&format!("{app} {noun} {urls}")));
        for line in describe(&list, "", true) {
            ui.log(&line);
        }
        Ok(list)
    }

    /// Insert `buildpack` before the entry at `index`, or at the end.
    pub fn add(
        &self,
        app: &str,
        remote: Option<&str>,
        buildpack: &str,
        index: Option<&str>,
        ui: &mut dyn Ui,
    ) -> Result<BuildpackList, BuildpackError> {
        let index = index.map(validate_index).transpose()?;
        let current = self.current(app)?;
        let target = self.resolver.target(buildpack)?;
        let next = mutate(&current, Operation::Add { target, index })?;

        let confirmed = self.apply(app, &next)?;
        log_lines(ui, announce_change(app, remote, &confirmed, "added"));
        Ok(confirmed)
    }

    /// Replace the entry at `index` (default 1) with `buildpack`.
    pub fn set(
        &self,
        app: &str,
        remote: Option<&str>,
        buildpack: &str,
        index: Option<&str>,
        ui: &mut dyn Ui,
    ) -> Result<BuildpackList, BuildpackError> {
        let index = index.map(validate_index).transpose()?.unwrap_or(1);
        let current = self.current(app)?;
        let target = self.resolver.target(buildpack)?;

        if current
            .position_of_url(&target.requested, &target.url)
            .is_some()
        {
            return Err(BuildpackError::AlreadySet(target.requested));
        }

        let operation = if current.is_empty() {
            Operation::Add {
                target,
                index: None,
            }
        } else {
            current.validate_index_in_range(index)?;
            Operation::Update { target, index }
        };
        let next = mutate(&current, operation)?;

        let confirmed = self.apply(app, &next)?;
        log_lines(ui, announce_change(app, remote, &confirmed, "set"));
        Ok(confirmed)
    }

    /// Remove one buildpack, chosen either by `index` or by name/URL.
    pub fn remove(
        &self,
        app: &str,
        remote: Option<&str>,
        buildpack: Option<&str>,
        index: Option<&str>,
        ui: &mut dyn Ui,
    ) -> Result<BuildpackList, BuildpackError> {
        let index = match (buildpack, index) {
            (Some(_), Some(_)) => return Err(BuildpackError::IndexAndBuildpack),
            (None, None) => return Err(BuildpackError::MissingTarget),
            (_, Some(raw)) => Some(validate_index(raw)?),
            (Some(_), None) => None,
        };

        let current = self.current(app)?;
        if current.is_empty() {
            return Err(BuildpackError::NoBuildpacks {
                app: app.to_string(),
            });
        }

        let index = match (index, buildpack) {
            (Some(index), _) => {
                current.validate_index_in_range(index)?;
                index
            }
            (None, Some(buildpack)) => {
                let target = self.resolver.target(buildpack)?;
                let position = current
                    .position_of_url(&target.requested, &target.url)
                    .ok_or(BuildpackError::NotInList)?;
                current.entries()[position].ordinal + 1
            }
            (None, None) => return Err(BuildpackError::MissingTarget),
        };

        let next = mutate(&current, Operation::Remove { index })?;
        if next.is_empty() {
            return self.persist_cleared(app, "Buildpack removed.", ui);
        }

        let confirmed = self.apply(app, &next)?;
        log_lines(ui, announce_change(app, remote, &confirmed, "removed"));
        Ok(confirmed)
    }

    /// Remove every buildpack from the app.
    pub fn clear(&self, app: &str, ui: &mut dyn Ui) -> Result<BuildpackList, BuildpackError> {
        self.persist_cleared(app, "Buildpacks cleared.", ui)
    }

    fn persist_cleared(
        &self,
        app: &str,
        message: &str,
        ui: &mut dyn Ui,
    ) -> Result<BuildpackList, BuildpackError> {
        let next = mutate(&BuildpackList::empty(), Operation::Clear)?;
        let confirmed = self.apply(app, &next)?;
        let config_vars = self.api.config_vars(app)?;

        match legacy_override(&config_vars) {
            Some(var) => {
                ui.log(message);
                ui.warn(&format!(
                    "The {var} config var is still set and will be used for the next release"
                ));
            }
            None => ui.log(&format!(
                "{message} Next release on {app} will detect buildpacks normally."
            )),
        }
        Ok(confirmed)
    }
}

fn from_installations(installations: Vec<BuildpackInstallation>) -> BuildpackList {
    let entries = installations.into_iter().map(BuildpackEntry::from).collect();
    BuildpackList::from_entries(strip_urns(entries))
}

fn strip_urns(entries: Vec<BuildpackEntry>) -> Vec<BuildpackEntry> {
    entries
        .into_iter()
        .map(|mut entry| {
            if let Some(stripped) = entry.url.strip_prefix(URN_PREFIX) {
                entry.url = stripped.to_string();
            }
            entry
        })
        .collect()
}

fn legacy_override(config_vars: &ConfigVars) -> Option<&'static str> {
    LEGACY_OVERRIDES.into_iter().find(|name| {
        config_vars
            .get(*name)
            .and_then(|value| value.as_deref())
            .is_some_and(|value| !value.is_empty())
    })
}

fn log_lines(ui: &mut dyn Ui, lines: Vec<String>) {
    for line in lines {
        ui.log(&line);
    }
}

/// Display lines for `list`, one `N. name` line per entry.
///
/// With `one_line_if_single`, a single entry is shown as its bare name.
pub fn describe(list: &BuildpackList, indent: &str, one_line_if_single: bool) -> Vec<String> {
    if one_line_if_single && list.len() == 1 {
        return list
            .iter()
            .map(|entry| url_to_display_name(&entry.url, true))
            .collect();
    }

    list.iter()
        .enumerate()
        .map(|(position, entry)| {
            format!(
                "{indent}{}. {}",
                position + 1,
                url_to_display_name(&entry.url, true)
            )
        })
        .collect()
}

/// The summary shown after a successful change.
pub fn announce_change(
    app: &str,
    remote: Option<&str>,
    list: &BuildpackList,
    action: &str,
) -> Vec<String> {
    let push = output::command(&push_command(remote));

    if let [only] = list.entries() {
        return vec![
            format!(
                "Buildpack {action}. Next release on {app} will use {}.",
                url_to_display_name(&only.url, false)
            ),
            format!("Run {push} to create a new release using this buildpack."),
        ];
    }

    let mut lines = vec![format!("Buildpack {action}. Next release on {app} will use:")];
    lines.extend(describe(list, "  ", true));
    lines.push(format!(
        "Run {push} to create a new release using these buildpacks."
    ));
    lines
}
