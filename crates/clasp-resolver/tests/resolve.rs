//! End-to-end resolution tests against an in-memory provider whose
//! versions compare lexicographically.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::Arc;

use clasp_core::alias::ResolveArgs;
use clasp_core::config::{ResolveConfig, ResolveSettings};
use clasp_core::coord::{Coord, CoordId};
use clasp_core::library::Lib;
use clasp_resolver::{make_classpath, resolve_deps_with, ClasspathArgs, LibMap, Provider, Reason};
use clasp_util::errors::ClaspError;

fn lib(name: &str) -> Lib {
    Lib::new("test", name)
}

fn child(name: &str, version: &str) -> (Lib, Option<Coord>) {
    (lib(name), Some(Coord::maven(version)))
}

fn child_excluding(name: &str, version: &str, exclusions: &[&str]) -> (Lib, Option<Coord>) {
    let mut coord = Coord::maven(version);
    coord.exclusions = exclusions.iter().map(|n| lib(n)).collect();
    (lib(name), Some(coord))
}

fn no_coord(name: &str) -> (Lib, Option<Coord>) {
    (lib(name), None)
}

/// In-memory provider: children come from a fixed table, versions compare
/// lexicographically on their version string.
#[derive(Default)]
struct FakeProvider {
    repo: HashMap<(Lib, String), Vec<(Lib, Option<Coord>)>>,
    fail_deps_of: Option<Lib>,
}

impl FakeProvider {
    fn add(&mut self, name: &str, version: &str, children: Vec<(Lib, Option<Coord>)>) {
        self.repo.insert((lib(name), version.to_string()), children);
    }
}

impl Provider for FakeProvider {
    fn canonicalize(
        &self,
        lib: &Lib,
        coord: &Coord,
        _config: &ResolveConfig,
    ) -> Result<(Lib, Coord), ClaspError> {
        Ok((lib.clone(), coord.clone()))
    }

    fn dep_id(
        &self,
        _lib: &Lib,
        coord: &Coord,
        _config: &ResolveConfig,
    ) -> Result<CoordId, ClaspError> {
        Ok(CoordId::Version(coord.version().unwrap_or("").to_string()))
    }

    fn manifest_type(
        &self,
        _lib: &Lib,
        coord: &Coord,
        _config: &ResolveConfig,
    ) -> Result<Coord, ClaspError> {
        Ok(coord.clone())
    }

    fn coord_deps(
        &self,
        lib: &Lib,
        coord: &Coord,
        _config: &ResolveConfig,
    ) -> Result<Vec<(Lib, Option<Coord>)>, ClaspError> {
        if self.fail_deps_of.as_ref() == Some(lib) {
            return Err(ClaspError::provider(lib, coord, "synthetic failure"));
        }
        let version = coord.version().unwrap_or("").to_string();
        Ok(self
            .repo
            .get(&(lib.clone(), version))
            .cloned()
            .unwrap_or_default())
    }

    fn compare_versions(
        &self,
        _lib: &Lib,
        a: &Coord,
        b: &Coord,
        _config: &ResolveConfig,
    ) -> Result<Ordering, ClaspError> {
        Ok(a.version().cmp(&b.version()))
    }

    fn coord_paths(
        &self,
        lib: &Lib,
        coord: &Coord,
        _config: &ResolveConfig,
    ) -> Result<Vec<PathBuf>, ClaspError> {
        let version = coord.version().unwrap_or("");
        Ok(vec![PathBuf::from(format!(
            "repo/{}-{version}.jar",
            lib.name()
        ))])
    }

    fn lib_location(
        &self,
        lib: &Lib,
        _coord: &Coord,
        _config: &ResolveConfig,
    ) -> Result<PathBuf, ClaspError> {
        Ok(PathBuf::from(format!("repo/{}", lib.name())))
    }

    fn coord_summary(&self, lib: &Lib, coord: &Coord) -> String {
        format!("{lib} {}", coord.version().unwrap_or("?"))
    }
}

async fn resolve_args(
    provider: FakeProvider,
    tops: &[(&str, &str)],
    args: ResolveArgs,
    trace: bool,
) -> Result<LibMap, ClaspError> {
    let deps: Vec<(Lib, Coord)> = tops
        .iter()
        .map(|(name, version)| (lib(name), Coord::maven(*version)))
        .collect();
    resolve_deps_with(
        Arc::new(provider),
        Arc::new(ResolveConfig::new("/proj", "/repo")),
        deps,
        &args,
        &ResolveSettings {
            trace,
            threads: Some(4),
        },
    )
    .await
}

async fn resolve(provider: FakeProvider, tops: &[(&str, &str)]) -> LibMap {
    resolve_args(provider, tops, ResolveArgs::default(), false)
        .await
        .unwrap()
}

/// `name -> version` view of a lib map.
fn versions(map: &LibMap) -> BTreeMap<String, String> {
    map.libs
        .iter()
        .map(|(lib, resolved)| {
            (
                lib.name().to_string(),
                resolved.coord.version().unwrap_or("").to_string(),
            )
        })
        .collect()
}

fn expect(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(n, v)| (n.to_string(), v.to_string()))
        .collect()
}

#[tokio::test]
async fn basic_transitive() {
    let mut provider = FakeProvider::default();
    provider.add(
        "clojure",
        "1.9.0",
        vec![child("spec.alpha", "0.1.124"), child("core.specs.alpha", "0.1.10")],
    );
    provider.add("spec.alpha", "0.1.124", vec![]);
    provider.add("core.specs.alpha", "0.1.10", vec![]);

    let map = resolve(provider, &[("clojure", "1.9.0")]).await;
    assert_eq!(
        versions(&map),
        expect(&[
            ("clojure", "1.9.0"),
            ("spec.alpha", "0.1.124"),
            ("core.specs.alpha", "0.1.10"),
        ])
    );
}

#[tokio::test]
async fn top_dep_wins_over_deeper() {
    let mut provider = FakeProvider::default();
    provider.add(
        "clojure",
        "1.9.0",
        vec![child("spec.alpha", "0.1.124"), child("core.specs.alpha", "0.1.10")],
    );
    provider.add("spec.alpha", "0.1.124", vec![]);
    provider.add("spec.alpha", "0.1.1", vec![]);
    provider.add("core.specs.alpha", "0.1.10", vec![]);

    let map = resolve(
        provider,
        &[("clojure", "1.9.0"), ("spec.alpha", "0.1.1")],
    )
    .await;
    assert_eq!(versions(&map)["spec.alpha"], "0.1.1");
}

#[tokio::test]
async fn newer_wins_when_not_top() {
    let mut provider = FakeProvider::default();
    provider.add("a", "1", vec![child("b", "1"), child("c", "2")]);
    provider.add("b", "1", vec![child("c", "1")]);
    provider.add("c", "1", vec![]);
    provider.add("c", "2", vec![]);

    let map = resolve(provider, &[("a", "1")]).await;
    assert_eq!(versions(&map), expect(&[("a", "1"), ("b", "1"), ("c", "2")]));
}

#[tokio::test]
async fn orphaning_by_newer_selection() {
    let mut provider = FakeProvider::default();
    provider.add("a", "1", vec![child("d", "1")]);
    provider.add("b", "1", vec![child("e", "1")]);
    provider.add("c", "1", vec![child("e", "2")]);
    provider.add("d", "1", vec![]);
    provider.add("d", "2", vec![]);
    provider.add("e", "1", vec![child("d", "2")]);
    provider.add("e", "2", vec![]);

    let map = resolve(provider, &[("a", "1"), ("b", "1"), ("c", "1")]).await;
    // d:2 was enqueued under e:1, which e:2 displaced before the child
    // was dequeued, so d stays at 1
    assert_eq!(
        versions(&map),
        expect(&[("a", "1"), ("b", "1"), ("c", "1"), ("d", "1"), ("e", "2")])
    );
}

#[tokio::test]
async fn exclusion_narrowing_across_paths() {
    for order in [
        [("a", "1"), ("b", "1")],
        [("b", "1"), ("a", "1")],
    ] {
        let mut provider = FakeProvider::default();
        provider.add("a", "1", vec![child_excluding("c", "1", &["d"])]);
        provider.add("b", "1", vec![child("c", "1")]);
        provider.add("c", "1", vec![child("d", "1")]);
        provider.add("d", "1", vec![]);

        let map = resolve(provider, &order).await;
        assert_eq!(
            versions(&map),
            expect(&[("a", "1"), ("b", "1"), ("c", "1"), ("d", "1")]),
            "top-dep order {order:?}"
        );
    }
}

#[tokio::test]
async fn exclusion_suppresses_subtree() {
    let mut provider = FakeProvider::default();
    provider.add("a", "1", vec![child_excluding("c", "1", &["d"])]);
    provider.add("c", "1", vec![child("d", "1")]);
    provider.add("d", "1", vec![]);

    let map = resolve(provider, &[("a", "1")]).await;
    assert_eq!(versions(&map), expect(&[("a", "1"), ("c", "1")]));
}

#[tokio::test]
async fn exclusion_matches_dollar_suffixed_libs() {
    let mut provider = FakeProvider::default();
    provider.add("a", "1", vec![child_excluding("c", "1", &["d"])]);
    provider.add("c", "1", vec![child("d$natives", "1")]);
    provider.add("d$natives", "1", vec![]);

    let map = resolve(provider, &[("a", "1")]).await;
    // d$natives shares d's base name, so the exclusion of d covers it
    assert_eq!(versions(&map), expect(&[("a", "1"), ("c", "1")]));
}

#[tokio::test]
async fn cycle_terminates() {
    let mut provider = FakeProvider::default();
    provider.add("a", "1", vec![child("b", "1"), child("c", "2")]);
    provider.add("b", "1", vec![child("c", "1")]);
    provider.add("c", "1", vec![child("a", "1")]);
    provider.add("c", "2", vec![child("a", "1")]);

    let map = resolve(provider, &[("a", "1")]).await;
    assert_eq!(versions(&map), expect(&[("a", "1"), ("b", "1"), ("c", "2")]));
}

#[tokio::test]
async fn self_cycle_terminates() {
    let mut provider = FakeProvider::default();
    provider.add("a", "1", vec![child("a", "1"), child("b", "1")]);
    provider.add("b", "1", vec![child("b", "1")]);

    let map = resolve(provider, &[("a", "1")]).await;
    assert_eq!(versions(&map), expect(&[("a", "1"), ("b", "1")]));
}

#[tokio::test]
async fn empty_deps_is_empty_lib_map() {
    let map = resolve(FakeProvider::default(), &[]).await;
    assert!(map.libs.is_empty());
}

#[tokio::test]
async fn same_version_via_multiple_parents_records_dependents() {
    let mut provider = FakeProvider::default();
    provider.add("a", "1", vec![child("c", "1")]);
    provider.add("b", "1", vec![child("c", "1")]);
    provider.add("c", "1", vec![]);

    let map = resolve(provider, &[("a", "1"), ("b", "1")]).await;
    let c = &map.libs[&lib("c")];
    assert_eq!(c.dependents, vec![lib("a"), lib("b")]);
    // top deps have no dependents
    assert!(map.libs[&lib("a")].dependents.is_empty());
}

#[tokio::test]
async fn top_order_does_not_affect_result_without_top_conflicts() {
    for order in [
        [("a", "1"), ("b", "1")],
        [("b", "1"), ("a", "1")],
    ] {
        let mut provider = FakeProvider::default();
        provider.add("a", "1", vec![child("c", "1")]);
        provider.add("b", "1", vec![child("c", "2")]);
        provider.add("c", "1", vec![]);
        provider.add("c", "2", vec![]);

        let map = resolve(provider, &order).await;
        assert_eq!(
            versions(&map),
            expect(&[("a", "1"), ("b", "1"), ("c", "2")]),
            "top-dep order {order:?}"
        );
    }
}

#[tokio::test]
async fn override_deps_pin_transitive_version() {
    let mut provider = FakeProvider::default();
    provider.add("a", "1", vec![child("b", "2")]);
    provider.add("b", "2", vec![]);
    provider.add("b", "5", vec![]);

    let mut args = ResolveArgs::default();
    args.override_deps.insert(lib("b"), Coord::maven("5"));

    let map = resolve_args(provider, &[("a", "1")], args, false).await.unwrap();
    assert_eq!(versions(&map)["b"], "5");
}

#[tokio::test]
async fn default_deps_fill_missing_coordinates() {
    let mut provider = FakeProvider::default();
    provider.add("a", "1", vec![no_coord("b")]);
    provider.add("b", "7", vec![]);

    let mut args = ResolveArgs::default();
    args.default_deps.insert(lib("b"), Coord::maven("7"));

    let map = resolve_args(provider, &[("a", "1")], args, false).await.unwrap();
    assert_eq!(versions(&map)["b"], "7");
}

#[tokio::test]
async fn missing_coordinate_without_default_is_error() {
    let mut provider = FakeProvider::default();
    provider.add("a", "1", vec![no_coord("b")]);

    let err = resolve_args(provider, &[("a", "1")], ResolveArgs::default(), false)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("test/b"));
}

#[tokio::test]
async fn extra_deps_join_the_top_level() {
    let mut provider = FakeProvider::default();
    provider.add("a", "1", vec![]);
    provider.add("x", "3", vec![]);

    let mut args = ResolveArgs::default();
    args.extra_deps.insert(lib("x"), Coord::maven("3"));

    let map = resolve_args(provider, &[("a", "1")], args, false).await.unwrap();
    assert_eq!(versions(&map), expect(&[("a", "1"), ("x", "3")]));
    // extra deps are top deps: a deeper version cannot displace them
    assert!(map.libs[&lib("x")].dependents.is_empty());
}

#[tokio::test]
async fn provider_failure_aborts_resolution() {
    let mut provider = FakeProvider::default();
    provider.add("a", "1", vec![child("bad", "1")]);
    provider.fail_deps_of = Some(lib("bad"));

    let err = resolve_args(provider, &[("a", "1")], ResolveArgs::default(), false)
        .await
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("test/bad"));
    assert!(message.contains("synthetic failure"));
}

#[tokio::test]
async fn trace_records_include_decisions() {
    let mut provider = FakeProvider::default();
    provider.add("a", "1", vec![child("b", "1"), child("c", "2")]);
    provider.add("b", "1", vec![child("c", "1")]);
    provider.add("c", "1", vec![]);
    provider.add("c", "2", vec![]);

    let map = resolve_args(provider, &[("a", "1")], ResolveArgs::default(), true)
        .await
        .unwrap();
    let trace = map.trace.as_ref().unwrap();

    assert_eq!(trace.log[0].lib, lib("a"));
    assert_eq!(trace.log[0].reason, Reason::NewTopDep);
    assert!(trace.log[0].include);

    let c_old = trace
        .log
        .iter()
        .find(|entry| entry.lib == lib("c") && entry.reason == Reason::OlderVersion)
        .unwrap();
    assert!(!c_old.include);
    assert_eq!(c_old.path, vec![lib("a"), lib("b")]);
}

#[tokio::test]
async fn no_trace_by_default() {
    let mut provider = FakeProvider::default();
    provider.add("a", "1", vec![]);
    let map = resolve(provider, &[("a", "1")]).await;
    assert!(map.trace.is_none());
}

#[tokio::test]
async fn paths_are_materialized_for_every_lib() {
    let mut provider = FakeProvider::default();
    provider.add("a", "1", vec![child("b", "2")]);
    provider.add("b", "2", vec![]);

    let map = resolve(provider, &[("a", "1")]).await;
    assert_eq!(map.libs[&lib("a")].paths, vec![PathBuf::from("repo/a-1.jar")]);
    assert_eq!(map.libs[&lib("b")].paths, vec![PathBuf::from("repo/b-2.jar")]);
}

#[tokio::test]
async fn classpath_from_resolution() {
    let mut provider = FakeProvider::default();
    provider.add("a", "1", vec![child("b", "2")]);
    provider.add("b", "2", vec![]);

    let map = resolve(provider, &[("a", "1")]).await;
    let cp = make_classpath(
        &map,
        &["src".to_string()],
        &ClasspathArgs {
            extra_paths: vec!["dev".to_string()],
            ..Default::default()
        },
    );
    assert_eq!(cp, "dev:src:repo/a-1.jar:repo/b-2.jar");
}
