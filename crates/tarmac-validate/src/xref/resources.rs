//! Library resource references

use crate::code::Code;
use crate::context::ValidationContext;
use crate::diagnostic::Findings;
use tarmac_core::NodeId;
use tarmac_library::ResourceKind;
use tarmac_scene::Entity;

/// The kind of asset an entity's resource path must point at
pub fn resource_kind(entity: &Entity) -> Option<ResourceKind> {
    match entity {
        Entity::ObjectPlacement(_) => Some(ResourceKind::Object),
        Entity::Facade(_) => Some(ResourceKind::Facade),
        Entity::Forest(_) => Some(ResourceKind::Forest),
        Entity::DrapedOrtho(_) => Some(ResourceKind::Orthophoto),
        Entity::DrapedPolygon(_) => Some(ResourceKind::DrapedPolygon),
        Entity::LinePlacement(_) => Some(ResourceKind::Line),
        _ => None,
    }
}

/// Check that every resource path exists, has the right type, and (for the
/// Gateway) comes from the default library without being deprecated or
/// private. Without a resource manager nothing is checked.
pub fn check_resources(ctx: &ValidationContext, ids: impl IntoIterator<Item = NodeId>, out: &mut Findings) {
    if !ctx.config.check_resources {
        return;
    }
    let Some(resources) = ctx.resources else {
        log::debug!("No resource manager; skipping resource checks");
        return;
    };
    let library = ctx.library.filter(|_| out.target().is_gateway());

    for id in ids {
        let Some(entity) = ctx.graph.entity(id) else {
            continue;
        };
        let (Some(kind), Some(path)) = (resource_kind(entity), entity.resource()) else {
            continue;
        };
        let name = ctx.graph.name(id);

        if resources.resolve(path).is_none() {
            out.emit(
                Code::ResourceMissing,
                format!("The {} '{}' uses '{}', which cannot be found.", kind.label(), name, path),
                [id],
            );
            continue;
        }
        if !kind.accepts(path) {
            out.emit(
                Code::ResourceWrongType,
                format!(
                    "The {} '{}' uses '{}', which is not a {} resource.",
                    kind.label(),
                    name,
                    path,
                    kind.label()
                ),
                [id],
            );
            continue;
        }

        let Some(library) = library else {
            continue;
        };
        if !library.is_default(path) {
            out.emit(
                Code::ResourceNotDefault,
                format!("'{}' is not part of the default library and cannot be shared.", path),
                [id],
            );
        } else if library.is_deprecated(path) {
            out.emit(
                Code::ResourceDeprecated,
                format!("'{}' is deprecated and cannot be used in shared scenery.", path),
                [id],
            );
        } else if library.is_private(path) {
            out.emit(
                Code::ResourcePrivate,
                format!("'{}' is private to its library and cannot be used in shared scenery.", path),
                [id],
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ExportTarget, ValidationConfig};
    use crate::diagnostic::DiagnosticList;
    use tarmac_core::LatLon;
    use tarmac_library::{LibraryCatalog, LibraryExport};
    use tarmac_scene::entity::{AirportData, ObjectData};
    use tarmac_scene::SceneGraph;

    fn catalog() -> LibraryCatalog {
        let mut lib = LibraryCatalog::new();
        for (path, default, deprecated, private) in [
            ("lib/tower.obj", true, false, false),
            ("lib/old_tower.obj", true, true, false),
            ("lib/secret.obj", true, false, true),
            ("custom/hangar.obj", false, false, false),
            ("lib/apron.pol", true, false, false),
        ] {
            lib.register(
                LibraryExport {
                    path: path.to_string(),
                    file: path.to_string(),
                    default,
                    deprecated,
                    private,
                },
                path.into(),
            );
        }
        lib
    }

    fn scene(paths: &[&str]) -> (SceneGraph, NodeId, Vec<NodeId>) {
        let mut g = SceneGraph::new();
        let apt = g
            .add(
                g.root(),
                "Test",
                Entity::Airport(AirportData {
                    icao: "TEST".to_string(),
                    ..Default::default()
                }),
            )
            .unwrap();
        let ids = paths
            .iter()
            .map(|p| {
                g.add(
                    apt,
                    "obj",
                    Entity::ObjectPlacement(ObjectData {
                        location: LatLon::new(0.0, 0.0),
                        heading: 0.0,
                        resource: p.to_string(),
                    }),
                )
                .unwrap()
            })
            .collect();
        (g, apt, ids)
    }

    fn run(paths: &[&str], target: ExportTarget) -> Vec<Code> {
        let (g, apt, ids) = scene(paths);
        let config = ValidationConfig {
            export_target: target,
            ..Default::default()
        };
        let lib = catalog();
        let ctx = ValidationContext::new(&g, &config)
            .with_resources(&lib)
            .with_library(&lib);
        let mut list = DiagnosticList::new();
        let mut out = Findings::new(&mut list, Some(apt), target);
        check_resources(&ctx, ids, &mut out);
        list.iter().map(|d| d.code()).collect()
    }

    #[test]
    fn test_missing_and_wrong_type() {
        assert_eq!(
            run(&["lib/tower.obj", "lib/nothing.obj", "lib/apron.pol"], ExportTarget::XPlane1200),
            vec![Code::ResourceMissing, Code::ResourceWrongType]
        );
    }

    #[test]
    fn test_library_membership_only_for_gateway() {
        let paths = ["lib/old_tower.obj", "lib/secret.obj", "custom/hangar.obj"];
        assert!(run(&paths, ExportTarget::XPlane1200).is_empty());
        assert_eq!(
            run(&paths, ExportTarget::Gateway),
            vec![Code::ResourceDeprecated, Code::ResourcePrivate, Code::ResourceNotDefault]
        );
    }

    #[test]
    fn test_skipped_without_manager_or_when_disabled() {
        let (g, apt, ids) = scene(&["lib/nothing.obj"]);
        let config = ValidationConfig::default();
        let ctx = ValidationContext::new(&g, &config);
        let mut list = DiagnosticList::new();
        let mut out = Findings::new(&mut list, Some(apt), config.export_target);
        check_resources(&ctx, ids.clone(), &mut out);
        assert!(list.is_empty());

        let config = ValidationConfig {
            check_resources: false,
            ..Default::default()
        };
        let lib = catalog();
        let ctx = ValidationContext::new(&g, &config).with_resources(&lib);
        let mut out = Findings::new(&mut list, Some(apt), config.export_target);
        check_resources(&ctx, ids, &mut out);
        assert!(list.is_empty());
    }
}
