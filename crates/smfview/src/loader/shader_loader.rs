use std::path::{Path, PathBuf};

use tracing::debug;

use crate::engine::{GraphicsBuildError, ShaderKind};

const COMMON_FILE: &str = "common.wgsl";

/// Built-in sources, keyed by file name.
const BUILTIN_SOURCES: &[(&str, &str)] = &[
    (COMMON_FILE, include_str!("../shaders/common.wgsl")),
    ("vertex_lit.vs.wgsl", include_str!("../shaders/vertex_lit.vs.wgsl")),
    ("vertex_lit.fs.wgsl", include_str!("../shaders/vertex_lit.fs.wgsl")),
    ("fragment_lit.vs.wgsl", include_str!("../shaders/fragment_lit.vs.wgsl")),
    ("fragment_lit.fs.wgsl", include_str!("../shaders/fragment_lit.fs.wgsl")),
];

/// Resolves WGSL sources either from the binary or from a directory on disk.
///
/// Every stage source gets `common.wgsl` prepended.
#[derive(Debug, Clone, Default)]
pub struct ShaderLoader {
    shader_dir: Option<PathBuf>,
}

impl ShaderLoader {
    pub fn new(shader_dir: Option<PathBuf>) -> Self {
        Self { shader_dir }
    }

    /// Returns the full source of one stage of a program, e.g. `vertex_lit` + `Vertex`.
    pub fn load(&self, program: &str, kind: ShaderKind) -> Result<String, GraphicsBuildError> {
        let file_name = format!("{program}.{}.wgsl", kind.file_suffix());
        let header = self.load_source(COMMON_FILE)?;
        let source = self.load_source(&file_name)?;
        Ok(format!("{header}\n{source}"))
    }

    fn load_source(&self, file_name: &str) -> Result<String, GraphicsBuildError> {
        match &self.shader_dir {
            Some(dir) => read_source(&dir.join(file_name)),
            None => BUILTIN_SOURCES
                .iter()
                .find(|(name, _)| *name == file_name)
                .map(|(_, source)| source.to_string())
                .ok_or_else(|| GraphicsBuildError::ShaderSource {
                    path: PathBuf::from(file_name),
                    source: std::io::ErrorKind::NotFound.into(),
                }),
        }
    }
}

fn read_source(path: &Path) -> Result<String, GraphicsBuildError> {
    debug!("Loading shader source '{}'", path.display());
    std::fs::read_to_string(path).map_err(|source| GraphicsBuildError::ShaderSource {
        path: path.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::render::shader::UniformLayout;
    use crate::engine::shading::ShadingMode;
    use crate::engine::render::globals::GlobalType;

    /// Whether the `stage` entry point of `source` calls the function named `callee`.
    fn stage_calls(source: &str, stage: naga::ShaderStage, callee: &str) -> bool {
        let module = naga::front::wgsl::parse_str(source).unwrap();
        let Some((handle, _)) =
            module.functions.iter().find(|(_, function)| function.name.as_deref() == Some(callee))
        else {
            return false;
        };
        let entry_point = module.entry_points.iter().find(|ep| ep.stage == stage).unwrap();
        entry_point.function.body.iter().any(|statement| {
            matches!(statement, naga::Statement::Call { function, .. } if *function == handle)
        })
    }

    #[test]
    fn builtin_programs_reflect() {
        let loader = ShaderLoader::default();
        for mode in [ShadingMode::Vertex, ShadingMode::Fragment] {
            for kind in [ShaderKind::Vertex, ShaderKind::Fragment] {
                let source = loader.load(mode.program_name(), kind).unwrap();
                UniformLayout::reflect(mode.program_name(), &source, kind).unwrap();
            }
        }
    }

    #[test]
    fn vertex_lit_lights_in_vertex_stage() {
        let loader = ShaderLoader::default();
        let vs = loader.load("vertex_lit", ShaderKind::Vertex).unwrap();
        let fs = loader.load("vertex_lit", ShaderKind::Fragment).unwrap();
        let vs = UniformLayout::reflect("vs", &vs, ShaderKind::Vertex).unwrap();
        let fs = UniformLayout::reflect("fs", &fs, ShaderKind::Fragment).unwrap();
        assert!(vs.find(GlobalType::MaterialShininess.name()).is_some());
        assert!(vs.find(GlobalType::CameraLightPos.name()).is_some());
        assert!(fs.fields.is_empty());
    }

    #[test]
    fn fragment_lit_lights_in_fragment_stage() {
        let loader = ShaderLoader::default();
        let vs = loader.load("fragment_lit", ShaderKind::Vertex).unwrap();
        let fs = loader.load("fragment_lit", ShaderKind::Fragment).unwrap();
        let vs = UniformLayout::reflect("vs", &vs, ShaderKind::Vertex).unwrap();
        let fs = UniformLayout::reflect("fs", &fs, ShaderKind::Fragment).unwrap();
        assert!(vs.find(GlobalType::WorldLightPos.name()).is_none());
        assert!(fs.find(GlobalType::WorldLightPos.name()).is_some());
        assert!(fs.find(GlobalType::ViewPos.name()).is_some());
    }

    #[test]
    fn both_programs_share_one_reflectance_function() {
        let loader = ShaderLoader::default();
        let cases = [
            ("vertex_lit", ShaderKind::Vertex, naga::ShaderStage::Vertex, true),
            ("vertex_lit", ShaderKind::Fragment, naga::ShaderStage::Fragment, false),
            ("fragment_lit", ShaderKind::Vertex, naga::ShaderStage::Vertex, false),
            ("fragment_lit", ShaderKind::Fragment, naga::ShaderStage::Fragment, true),
        ];
        for (program, kind, stage, lights) in cases {
            let source = loader.load(program, kind).unwrap();
            assert_eq!(source.matches("fn reflect_light(").count(), 1, "{program}.{kind:?}");
            assert!(source.starts_with(include_str!("../shaders/common.wgsl")));
            assert_eq!(stage_calls(&source, stage, "reflect_light"), lights, "{program}.{kind:?}");
        }
    }

    #[test]
    fn directory_override() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(COMMON_FILE), "// header").unwrap();
        std::fs::write(dir.path().join("vertex_lit.fs.wgsl"), "// body").unwrap();
        let loader = ShaderLoader::new(Some(dir.path().to_owned()));
        assert_eq!(
            loader.load("vertex_lit", ShaderKind::Fragment).unwrap(),
            "// header\n// body"
        );

        let err = loader.load("vertex_lit", ShaderKind::Vertex).unwrap_err();
        assert!(matches!(err, GraphicsBuildError::ShaderSource { .. }));
    }

    #[test]
    fn unknown_builtin_program() {
        let err = ShaderLoader::default().load("toon", ShaderKind::Vertex).unwrap_err();
        assert!(matches!(err, GraphicsBuildError::ShaderSource { .. }));
    }
}
