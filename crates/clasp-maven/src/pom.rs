//! POM parsing: dependency declarations, dependency management, and
//! `${property}` interpolation.
//!
//! Only the parts of the POM model that matter for dependency discovery
//! are kept. Parent POMs are not chased across the repository; the
//! parent's group and version are retained for property fallback only.

use std::collections::BTreeMap;

use clasp_util::errors::ClaspError;
use quick_xml::events::Event;
use quick_xml::Reader;

/// A parsed Project Object Model.
#[derive(Debug, Clone, Default)]
pub struct Pom {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub packaging: Option<String>,
    pub parent_group: Option<String>,
    pub parent_version: Option<String>,
    pub properties: BTreeMap<String, String>,
    pub dependencies: Vec<PomDep>,
    pub managed: Vec<PomDep>,
}

/// A dependency declared in a POM.
#[derive(Debug, Clone, Default)]
pub struct PomDep {
    pub group_id: String,
    pub artifact_id: String,
    pub version: Option<String>,
    pub scope: Option<String>,
    pub optional: bool,
    pub exclusions: Vec<PomExclusion>,
}

/// An exclusion within a dependency declaration.
#[derive(Debug, Clone, Default)]
pub struct PomExclusion {
    pub group_id: String,
    pub artifact_id: Option<String>,
}

impl Pom {
    /// Effective group (falls back to the parent's).
    pub fn effective_group(&self) -> Option<&str> {
        self.group_id.as_deref().or(self.parent_group.as_deref())
    }

    /// Effective version (falls back to the parent's).
    pub fn effective_version(&self) -> Option<&str> {
        self.version.as_deref().or(self.parent_version.as_deref())
    }

    /// Managed version for `group:artifact` from `dependencyManagement`.
    pub fn managed_version(&self, group_id: &str, artifact_id: &str) -> Option<&str> {
        self.managed
            .iter()
            .find(|d| d.group_id == group_id && d.artifact_id == artifact_id)
            .and_then(|d| d.version.as_deref())
    }

    /// Replace `${key}` references using POM properties and the built-in
    /// `project.*` variables. Unresolvable references are left in place.
    pub fn interpolate(&self, input: &str) -> String {
        let mut out = input.to_string();
        for _ in 0..10 {
            let Some(start) = out.find("${") else { break };
            let Some(len) = out[start..].find('}') else { break };
            let key = &out[start + 2..start + len];
            match self.property(key) {
                Some(value) => out.replace_range(start..start + len + 1, &value),
                None => break,
            }
        }
        out
    }

    fn property(&self, key: &str) -> Option<String> {
        match key {
            "project.groupId" | "pom.groupId" => self.effective_group().map(str::to_string),
            "project.artifactId" | "pom.artifactId" => self.artifact_id.clone(),
            "project.version" | "pom.version" => self.effective_version().map(str::to_string),
            _ => self.properties.get(key).cloned(),
        }
    }

    /// Interpolate property references in every dependency entry.
    pub fn resolve_properties(&mut self) {
        let snapshot = self.clone();
        for dep in self.dependencies.iter_mut().chain(self.managed.iter_mut()) {
            dep.group_id = snapshot.interpolate(&dep.group_id);
            dep.artifact_id = snapshot.interpolate(&dep.artifact_id);
            if let Some(v) = &dep.version {
                dep.version = Some(snapshot.interpolate(v));
            }
        }
    }
}

/// Parse POM XML text.
pub fn parse(xml: &str) -> Result<Pom, ClaspError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut pom = Pom::default();
    let mut stack: Vec<String> = Vec::new();
    let mut text = String::new();
    let mut dep: Option<PomDep> = None;
    let mut excl: Option<PomExclusion> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                stack.push(tag);
                text.clear();

                match context(&stack).as_str() {
                    "project.dependencies.dependency"
                    | "project.dependencyManagement.dependencies.dependency" => {
                        dep = Some(PomDep::default());
                    }
                    ctx if ctx.ends_with(".exclusions.exclusion") && dep.is_some() => {
                        excl = Some(PomExclusion::default());
                    }
                    _ => {}
                }
            }
            Ok(Event::Text(e)) => {
                text = e
                    .unescape()
                    .map_err(|e| ClaspError::Manifest {
                        message: format!("invalid pom text: {e}"),
                    })?
                    .into_owned();
            }
            Ok(Event::End(_)) => {
                let ctx = context(&stack);
                let leaf = stack.last().cloned().unwrap_or_default();

                if leaf == "exclusion" && excl.is_some() {
                    if let (Some(done), Some(d)) = (excl.take(), dep.as_mut()) {
                        d.exclusions.push(done);
                    }
                } else if leaf == "dependency" && excl.is_none() && dep.is_some() {
                    if let Some(done) = dep.take() {
                        if ctx.contains("dependencyManagement") {
                            pom.managed.push(done);
                        } else {
                            pom.dependencies.push(done);
                        }
                    }
                } else if let Some(ex) = excl.as_mut() {
                    match leaf.as_str() {
                        "groupId" => ex.group_id = text.clone(),
                        "artifactId" => ex.artifact_id = Some(text.clone()),
                        _ => {}
                    }
                } else if let Some(d) = dep.as_mut() {
                    match leaf.as_str() {
                        "groupId" => d.group_id = text.clone(),
                        "artifactId" => d.artifact_id = text.clone(),
                        "version" => d.version = Some(text.clone()),
                        "scope" => d.scope = Some(text.clone()),
                        "optional" => d.optional = text.trim() == "true",
                        _ => {}
                    }
                } else {
                    match ctx.as_str() {
                        "project.groupId" => pom.group_id = Some(text.clone()),
                        "project.artifactId" => pom.artifact_id = Some(text.clone()),
                        "project.version" => pom.version = Some(text.clone()),
                        "project.packaging" => pom.packaging = Some(text.clone()),
                        "project.parent.groupId" => pom.parent_group = Some(text.clone()),
                        "project.parent.version" => pom.parent_version = Some(text.clone()),
                        _ => {
                            if stack.len() == 3 && stack[1] == "properties" {
                                pom.properties.insert(leaf.clone(), text.clone());
                            }
                        }
                    }
                }

                stack.pop();
                text.clear();
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(ClaspError::Manifest {
                    message: format!("invalid pom xml: {e}"),
                })
            }
        }
    }

    Ok(pom)
}

fn context(stack: &[String]) -> String {
    stack.join(".")
}
