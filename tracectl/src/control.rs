// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Tracing runtime control.

use ordermap::OrderMap;
use std::collections::HashSet;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, Registry, filter::LevelFilter, prelude::*, reload};

use crate::{display::TargetCfgDbByTag, targets::TRACING_TARGETS, trace_target};

trace_target!("tracectl", LevelFilter::INFO, &[]);

#[derive(Debug, Clone)]
pub struct TargetCfg {
    pub(crate) target: &'static str,
    pub(crate) name: &'static str,
    pub(crate) level: LevelFilter,
    pub(crate) tags: Vec<&'static str>,
}
impl TargetCfg {
    fn new(
        target: &'static str,
        name: &'static str,
        level: LevelFilter,
        tags: &'static [&'static str],
    ) -> Self {
        // a target can always be addressed by its own name
        let mut tags = tags.to_vec();
        if !tags.contains(&name) {
            tags.push(name);
        }
        Self {
            target,
            name,
            level,
            tags,
        }
    }
    #[must_use]
    pub fn target(&self) -> &'static str {
        self.target
    }
    #[must_use]
    pub fn level(&self) -> LevelFilter {
        self.level
    }
}

#[derive(Debug, Clone)]
pub struct Tag {
    pub(crate) tag: &'static str,
    pub(crate) targets: HashSet<&'static str>,
}
impl Tag {
    fn new(tag: &'static str, target: &'static str) -> Self {
        let mut targets = HashSet::with_capacity(1);
        targets.insert(target);
        Self { tag, targets }
    }
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.tag
    }
}

#[derive(Debug)]
pub(crate) struct TargetCfgDb {
    pub(crate) level: LevelFilter,
    pub(crate) targets: OrderMap<&'static str, TargetCfg>,
    pub(crate) tags: OrderMap<&'static str, Tag>,
}

impl TargetCfgDb {
    fn new(level: LevelFilter) -> Self {
        let mut db = Self {
            level,
            targets: OrderMap::new(),
            tags: OrderMap::new(),
        };
        for target in TRACING_TARGETS {
            db.register(target.target, target.name, target.level, target.tags);
        }
        db
    }
    fn register(
        &mut self,
        target: &'static str,
        name: &'static str,
        level: LevelFilter,
        tags: &'static [&'static str],
    ) {
        let tconfig = TargetCfg::new(target, name, level, tags);
        let tags = tconfig.tags.clone();

        if let Some(exist) = self.targets.insert(target, tconfig) {
            warn!("Target {} has been multiply defined!", exist.target);
        }
        for tag in &tags {
            if let Some(tag) = self.tags.get_mut(tag) {
                tag.targets.insert(target);
            } else {
                self.tags.insert(tag, Tag::new(tag, target));
            }
        }
    }
    fn env_filter(&self) -> EnvFilter {
        let mut filter = EnvFilter::new(self.level.to_string());
        for target in self.targets.values() {
            match format!("{}={}", target.target, target.level).parse() {
                Ok(directive) => filter = filter.add_directive(directive),
                Err(e) => error!("Skipping bad directive for target {}: {e}", target.target),
            }
        }
        filter
    }
    /// The tracing configuration string that reproduces the current levels.
    pub(crate) fn as_config_string(&self) -> String {
        let mut out = format!("default={}", self.level);
        for target in self.targets.values() {
            out += format!(",{}={}", target.name, target.level).as_str();
        }
        out
    }
    fn tag_targets_mut(&mut self, tag: &str) -> impl Iterator<Item = &mut TargetCfg> {
        let members = self.tags.get(tag).map(|t| t.targets.clone()).unwrap_or_default();
        self.targets
            .values_mut()
            .filter(move |target| members.contains(target.target))
    }
    fn tag_targets(&self, tag: &str) -> impl Iterator<Item = &TargetCfg> {
        let members = self.tags.get(tag).map(|t| t.targets.clone()).unwrap_or_default();
        self.targets
            .values()
            .filter(move |target| members.contains(target.target))
    }
}

#[derive(Debug)]
pub struct TracingControl {
    db: Mutex<TargetCfgDb>,
    reload_filter: reload::Handle<EnvFilter, Registry>,
}

static TRACING_CTL: OnceLock<TracingControl> = OnceLock::new();

/// Get a reference to the process-wide [`TracingControl`], initializing it if needed
pub fn get_trace_ctl() -> &'static TracingControl {
    TRACING_CTL.get_or_init(TracingControl::new)
}

impl TracingControl {
    fn new() -> Self {
        let db = TargetCfgDb::new(LevelFilter::INFO);
        let (filter, reload_filter) = reload::Layer::new(db.env_filter());

        // the script goes to stdout: logs go to stderr
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_line_number(true)
            .with_target(true)
            .with_level(true);

        if let Err(e) = tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init()
        {
            // a subscriber may already be installed (e.g. by a test harness)
            eprintln!("tracing subscriber not installed: {e}");
        }

        Self {
            db: Mutex::new(db),
            reload_filter,
        }
    }
    fn lock(&self) -> MutexGuard<'_, TargetCfgDb> {
        self.db.lock().unwrap_or_else(PoisonError::into_inner)
    }
    fn reload(&self, filter: EnvFilter) {
        if let Err(e) = self.reload_filter.reload(filter) {
            error!("Failed to reload tracing filter: {e}");
        }
    }
    #[cfg(test)]
    fn register(
        &self,
        target: &'static str,
        name: &'static str,
        level: LevelFilter,
        tags: &'static [&'static str],
    ) {
        let mut db = self.lock();
        db.register(target, name, level, tags);
        self.reload(db.env_filter());
    }
}

// public methods for TracingControl
impl TracingControl {
    pub fn init() {
        get_trace_ctl();
    }
    pub fn set_tag_level(&self, tag: &str, level: LevelFilter) {
        let mut db = self.lock();
        let mut changed = 0;
        for target in db.tag_targets_mut(tag) {
            if target.level != level {
                target.level = level;
                changed += 1;
            }
        }
        if changed > 0 {
            self.reload(db.env_filter());
        }
        info!("Changed log level for tag '{tag}' to {level}. Targets changed: {changed}");
    }
    pub fn set_level_all(&self, level: LevelFilter) {
        let mut db = self.lock();
        for target in db.targets.values_mut() {
            target.level = level;
        }
        self.reload(db.env_filter());
    }
    pub fn set_default_level(&self, level: LevelFilter) {
        let mut db = self.lock();
        if db.level != level {
            db.level = level;
            self.reload(db.env_filter());
        }
    }
    #[must_use]
    pub fn get_default_level(&self) -> LevelFilter {
        self.lock().level
    }

    /// Parse a string made of comma-separated tag=level, where level=off,error,warn,info,debug,trace
    fn parse_tracing_config(input: &str) -> Result<OrderMap<String, LevelFilter>, String> {
        let mut result = OrderMap::new();
        for item in input.split(',') {
            let item = item.trim();
            let Some((tag, level)) = item.split_once('=') else {
                return Err(format!("Invalid syntax '{item}': it should be tag=loglevel"));
            };
            let level = LevelFilter::from_str(level.trim())
                .map_err(|e| format!("invalid level {}: {e}", level.trim()))?;
            result.insert(tag.trim().to_string(), level);
        }
        Ok(result)
    }

    /// Apply a tracing configuration string.
    ///
    /// `default=level` sets the default level, `all=level` sets the level of every registered
    /// target, and any other `tag=level` applies to the targets carrying that tag.
    ///
    /// # Errors
    ///
    /// Fails if the string is not a comma-separated list of `tag=level` with valid levels.
    pub fn setup_from_string(&self, input: &str) -> Result<(), String> {
        let config = Self::parse_tracing_config(input)?;
        if let Some(level) = config.get("default") {
            self.set_default_level(*level);
        }
        if let Some(level) = config.get("all") {
            self.set_level_all(*level);
        }
        for (tag, level) in config.iter().filter(|(t, _)| *t != "default" && *t != "all") {
            self.set_tag_level(tag, *level);
        }
        Ok(())
    }

    #[must_use]
    pub fn get_tag(&self, tag: &str) -> Option<Tag> {
        self.lock().tags.get(tag).cloned()
    }
    #[must_use]
    pub fn get_target(&self, target: &str) -> Option<TargetCfg> {
        self.lock().targets.get(target).cloned()
    }
    pub fn get_targets_by_tag(&self, tag: &str) -> impl Iterator<Item = TargetCfg> {
        let db = self.lock();
        db.tag_targets(tag).cloned().collect::<Vec<_>>().into_iter()
    }
    #[must_use]
    pub fn targets_by_tag_string(&self) -> String {
        TargetCfgDbByTag(&self.lock()).to_string()
    }
    #[must_use]
    pub fn targets_string(&self) -> String {
        self.lock().to_string()
    }
    #[must_use]
    pub fn as_config_string(&self) -> String {
        self.lock().as_config_string()
    }
}

#[cfg(test)]
mod tests {
    use crate::control::get_trace_ctl;
    use crate::targets::TRACING_TARGETS;
    use crate::{LevelFilter, trace_target};
    use serial_test::serial;

    trace_target!("tracectl-tests", LevelFilter::WARN, &["gen-common"]);

    #[test]
    #[serial]
    fn test_auto_register_macro() {
        let static_targets: Vec<&str> = TRACING_TARGETS.iter().map(|c| c.target).collect();
        assert!(static_targets.contains(&module_path!()));
        // the crate itself registers its control module
        assert!(static_targets.contains(&"rosgen_tracectl::control"));

        let tctl = get_trace_ctl();
        assert_eq!(
            tctl.get_target(module_path!()).map(|t| t.level()),
            Some(LevelFilter::WARN)
        );
        assert!(tctl.get_tag("gen-common").is_some());
        // addressable by name too
        assert!(tctl.get_tag("tracectl-tests").is_some());
    }

    #[test]
    #[serial]
    fn test_register_and_change_tag_level() {
        const TAG: &str = "shared-tag";
        let tctl = get_trace_ctl();
        tctl.register("t-one", "t-one", LevelFilter::DEBUG, &[TAG]);
        tctl.register("t-two", "t-two", LevelFilter::ERROR, &[TAG]);

        let targets: Vec<_> = tctl.get_targets_by_tag(TAG).map(|t| t.target()).collect();
        assert_eq!(targets.len(), 2);

        tctl.set_tag_level(TAG, LevelFilter::OFF);
        assert_eq!(tctl.get_target("t-one").map(|t| t.level()), Some(LevelFilter::OFF));
        assert_eq!(tctl.get_target("t-two").map(|t| t.level()), Some(LevelFilter::OFF));
    }

    #[test]
    #[serial]
    fn test_setup_from_string() {
        let tctl = get_trace_ctl();
        tctl.register("t-three", "t-three", LevelFilter::TRACE, &["gen-other"]);

        tctl.setup_from_string("default=warn, gen-other=error").unwrap();
        assert_eq!(tctl.get_default_level(), LevelFilter::WARN);
        tctl.get_targets_by_tag("gen-other")
            .for_each(|t| assert_eq!(t.level(), LevelFilter::ERROR));
        assert!(tctl.as_config_string().starts_with("default=warn"));

        // bad level
        assert!(tctl.setup_from_string("gen-other=loud").is_err());
        // missing level
        assert!(tctl.setup_from_string("gen-other=error, foo").is_err());
    }
}
