use anyhow::{Context, Result};
use glam::{Quat, Vec3};
use std::path::Path;

use super::{Camera, Scene, Transform, TransformId};

/// Name of the synthetic root that turns glTF's +Y up into +Z up
pub const ROOT_NAME: &str = "glTF.root";

/// Loads the node hierarchy, cameras and mesh placements of a glTF file
///
/// Only what the observation mode needs is kept: node names and TRS,
/// perspective cameras, and one drawable per mesh primitive tinted with its
/// material's base color. Vertex data is not read.
pub fn load_gltf_scene(path: impl AsRef<Path>) -> Result<Scene> {
    let path = path.as_ref();
    log::info!("Loading glTF scene: {:?}", path);

    let (document, _buffers, _images) =
        gltf::import(path).with_context(|| format!("Failed to load glTF file: {:?}", path))?;

    let mut scene = Scene::new();
    let root = scene.add_transform(
        Transform::new(ROOT_NAME).with_rotation(Quat::from_rotation_x(std::f32::consts::FRAC_PI_2)),
    );

    let gltf_scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .context("glTF file has no scenes")?;

    for node in gltf_scene.nodes() {
        process_node(&node, root, &mut scene);
    }

    log::info!(
        "glTF scene loaded: {} transforms, {} cameras, {} drawables",
        scene.transforms().len(),
        scene.cameras().len(),
        scene.drawables().len()
    );

    Ok(scene)
}

fn process_node(node: &gltf::Node, parent: TransformId, scene: &mut Scene) {
    let (translation, rotation, scale) = node.transform().decomposed();
    let name = node
        .name()
        .map(str::to_owned)
        .unwrap_or_else(|| format!("Node.{}", node.index()));

    let id = scene.add_transform(
        Transform::new(name)
            .with_parent(parent)
            .with_position(Vec3::from_array(translation))
            .with_rotation(Quat::from_array(rotation))
            .with_scale(Vec3::from_array(scale)),
    );

    if let Some(camera) = node.camera() {
        match camera.projection() {
            gltf::camera::Projection::Perspective(perspective) => {
                scene.add_camera(Camera {
                    transform: id,
                    fovy: perspective.yfov(),
                    aspect: perspective.aspect_ratio().unwrap_or(1.0),
                    near: perspective.znear(),
                });
            }
            gltf::camera::Projection::Orthographic(_) => {
                log::warn!("Skipping orthographic camera on node {:?}", node.name());
            }
        }
    }

    if let Some(mesh) = node.mesh() {
        for primitive in mesh.primitives() {
            let bounds = primitive.bounding_box();
            let extent = Vec3::from_array(bounds.max) - Vec3::from_array(bounds.min);
            let color = primitive
                .material()
                .pbr_metallic_roughness()
                .base_color_factor();
            scene.add_drawable(id, color, extent.max_element().max(0.05));
        }
    }

    for child in node.children() {
        process_node(&child, id, scene);
    }
}
