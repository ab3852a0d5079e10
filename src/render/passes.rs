use crate::{
    assets::store::PreparedAssets,
    compile::plan::{Pass, RenderPlan, ScenePass, TexturePass},
    foundation::error::RibbonResult,
    render::backend::FrameRGBA,
};

pub trait PassBackend {
    /// Reset the target buffer to transparent pixels sized for `plan`.
    fn begin(&mut self, plan: &RenderPlan) -> RibbonResult<()>;

    fn exec_scene(&mut self, pass: &ScenePass, assets: &PreparedAssets) -> RibbonResult<()>;

    fn exec_texture(&mut self, pass: &TexturePass) -> RibbonResult<()>;

    fn readback_rgba8(&mut self, plan: &RenderPlan) -> RibbonResult<FrameRGBA>;
}

pub fn execute_plan<B: PassBackend + ?Sized>(
    backend: &mut B,
    plan: &RenderPlan,
    assets: &PreparedAssets,
) -> RibbonResult<FrameRGBA> {
    backend.begin(plan)?;

    for pass in &plan.passes {
        match pass {
            Pass::Scene(p) => backend.exec_scene(p, assets)?,
            Pass::Texture(p) => backend.exec_texture(p)?,
        }
    }

    backend.readback_rgba8(plan)
}

#[cfg(test)]
#[path = "../../tests/unit/render/passes.rs"]
mod tests;
