use crate::descriptor::ControllerDescriptor;
use anyhow::Context;
use device_registry::DeviceId;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

/// Controller descriptors keyed by name.
#[derive(Debug, Default, Clone)]
pub struct ControllerSet {
    pub controllers: HashMap<String, ControllerDescriptor>,
}

impl ControllerSet {
    pub fn insert(&mut self, desc: ControllerDescriptor) {
        self.controllers.insert(desc.name.clone(), desc);
    }

    /// Descriptors ordered by name, for stable output.
    pub fn sorted(&self) -> Vec<&ControllerDescriptor> {
        let mut out: Vec<_> = self.controllers.values().collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        out
    }

    /// Addressable ids claimed by more than one descriptor.
    pub fn duplicate_ids(&self) -> Vec<DeviceId> {
        let mut seen: BTreeMap<DeviceId, usize> = BTreeMap::new();
        for d in self.controllers.values() {
            let id = d.device_id();
            if id.is_addressable() {
                *seen.entry(id).or_default() += 1;
            }
        }
        seen.into_iter()
            .filter(|(_, n)| *n > 1)
            .map(|(id, _)| id)
            .collect()
    }
}

pub fn parse_descriptor(raw: &str) -> anyhow::Result<ControllerDescriptor> {
    let desc: ControllerDescriptor =
        serde_yaml::from_str(raw).context("decoding controller descriptor")?;
    desc.to_config()
        .with_context(|| format!("invalid controller descriptor: {}", desc.name))?;
    Ok(desc)
}

pub fn load_descriptor_file(path: impl AsRef<Path>) -> anyhow::Result<ControllerDescriptor> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading descriptor: {}", path.display()))?;
    parse_descriptor(&raw).with_context(|| format!("loading descriptor: {}", path.display()))
}

pub fn load_descriptors_dir(dir: impl AsRef<Path>) -> anyhow::Result<ControllerSet> {
    let mut set = ControllerSet::default();
    let mut entries: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir.as_ref())
        .with_context(|| format!("reading directory: {}", dir.as_ref().display()))?
    {
        let entry = entry?;
        let path = entry.path();
        if let Some(ext) = path.extension() {
            if ext == "yml" || ext == "yaml" {
                entries.push(path);
            }
        }
    }
    entries.sort();
    for p in entries {
        let desc = load_descriptor_file(&p)?;
        if set.controllers.contains_key(&desc.name) {
            anyhow::bail!("duplicate controller name {:?} in {}", desc.name, p.display());
        }
        set.insert(desc);
    }
    Ok(set)
}
