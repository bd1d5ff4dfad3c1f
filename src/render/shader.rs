//! Warp shader pair and its CPU twin.
//!
//! [`warp_vertex`] evaluates the same math as [`VERTEX_WGSL`] in `f32`, so software and GPU
//! targets place every mesh vertex identically.

use crate::foundation::math::smoothstep;
use crate::render::options::GeniePlayOptions;

/// Per-playback uniform block. Only `progress` changes between frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WarpUniforms {
    /// Surface size in device pixels.
    pub resolution: [f32; 2],
    /// Content size in device pixels.
    pub size: [f32; 2],
    /// Origin point in content-local device pixels.
    pub origin_local: [f32; 2],
    /// Travel direction from origin to content (not necessarily normalised).
    pub direction: [f32; 2],
    /// Neck width bounds `[min, max]` in device pixels.
    pub neck: [f32; 2],
    /// Progress range over which the collapsed mapping releases to identity.
    pub release_range: [f32; 2],
    pub curve_strength: f32,
    pub progress: f32,
}

impl WarpUniforms {
    pub fn from_options(opts: &GeniePlayOptions) -> Self {
        let size = [opts.size.w as f32, opts.size.h as f32];
        Self {
            resolution: size,
            size,
            origin_local: [opts.origin_local.x as f32, opts.origin_local.y as f32],
            direction: [opts.direction_vec.x as f32, opts.direction_vec.y as f32],
            neck: [opts.neck.min as f32, opts.neck.max as f32],
            release_range: [opts.release_range[0] as f32, opts.release_range[1] as f32],
            curve_strength: opts.curve_strength as f32,
            progress: 0.0,
        }
    }

    pub fn with_progress(mut self, progress: f32) -> Self {
        self.progress = progress;
        self
    }
}

/// Output of the vertex stage for one mesh vertex.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WarpedVertex {
    /// Surface position in device pixels (y down).
    pub position: [f32; 2],
    /// Clip-space position (y up).
    pub clip: [f32; 2],
    /// Texture coordinate, `(0, 0)` at the snapshot's top-left texel.
    pub tex: [f32; 2],
}

fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn safe_normalize(v: [f32; 2]) -> [f32; 2] {
    let len = v[0].hypot(v[1]);
    if len <= 0.0001 {
        return [0.0, -1.0];
    }
    [v[0] / len, v[1] / len]
}

/// CPU evaluation of the vertex stage.
pub fn warp_vertex(u: &WarpUniforms, position: [f32; 2], uv: [f32; 2]) -> WarpedVertex {
    let progress = u.progress.clamp(0.0, 1.0);
    let release = smoothstep(u.release_range[0], u.release_range[1], progress);
    let collapse = 1.0 - release;

    let dir = safe_normalize(u.direction);
    let normal = [-dir[1], dir[0]];

    let p = [position[0].clamp(0.0, 1.0), position[1].clamp(0.0, 1.0)];
    let base = [p[0] * u.size[0], p[1] * u.size[1]];
    let from_origin = [base[0] - u.origin_local[0], base[1] - u.origin_local[1]];

    let lon_origin = from_origin[0] * dir[0] + from_origin[1] * dir[1];
    let lat_origin = from_origin[0] * normal[0] + from_origin[1] * normal[1];

    let anchor = smoothstep(0.0, 0.28, p[1]);
    let head_hold = smoothstep(0.6, 1.0, p[1]);
    let neck_curve = p[1].powf(1.4);

    let base_width = u.size[0].max(1.0);
    let neck_min = u.neck[0].max(1.0);
    let neck_max = neck_min.max(u.neck[1]);
    let head_hold_width = mix(neck_min, base_width * 0.85, neck_curve);
    let collapsed_width = neck_max.min(head_hold_width);
    let half_width = (base_width * 0.5).max(1.0);
    let lat_norm = (lat_origin / half_width).clamp(-1.0, 1.0);
    let collapsed_half = (collapsed_width * 0.5).max(1.0);
    let expanded_half = half_width;
    let lat_collapsed =
        lat_norm * mix(collapsed_half, expanded_half * (0.6 + head_hold * 0.25), head_hold);
    let lat_expanded = lat_norm * expanded_half;
    let mut lat_final = mix(lat_collapsed, lat_expanded, release);

    let lon_pull_scale = mix(0.12, 1.0, anchor.powf(1.8));
    let bend_pull = u.curve_strength * collapse * (1.0 - p[1]).powf(1.85);
    let lon_collapsed = lon_origin * lon_pull_scale - bend_pull;
    let lon_final = mix(lon_collapsed, lon_origin, release);

    let lift = u.curve_strength * collapse * (1.0 - p[1]).powf(1.35);
    lat_final -= lift * mix(0.24, 0.04, release);
    lat_final += bend_pull * 0.24 * lat_norm * collapse;

    let pos = [
        u.origin_local[0] + dir[0] * lon_final + normal[0] * lat_final,
        u.origin_local[1] + dir[1] * lon_final + normal[1] * lat_final,
    ];
    let nx = pos[0] / u.resolution[0].max(1.0);
    let ny = pos[1] / u.resolution[1].max(1.0);

    WarpedVertex {
        position: pos,
        clip: [nx * 2.0 - 1.0, 1.0 - ny * 2.0],
        tex: [uv[0].clamp(0.0, 1.0), uv[1].clamp(0.0, 1.0)],
    }
}

/// Vertex stage. Entry point `vs`; `@location(0)` position, `@location(1)` uv.
pub const VERTEX_WGSL: &str = r#"
struct Uniforms {
  resolution: vec2<f32>,
  size: vec2<f32>,
  origin_local: vec2<f32>,
  direction: vec2<f32>,
  neck: vec2<f32>,
  release_range: vec2<f32>,
  curve_strength: f32,
  progress: f32,
  _pad: vec2<f32>,
};

@group(0) @binding(0) var<uniform> u: Uniforms;

struct VsOut {
  @builtin(position) pos: vec4<f32>,
  @location(0) uv: vec2<f32>,
};

fn safe_normalize(v: vec2<f32>) -> vec2<f32> {
  let len = length(v);
  if (len <= 0.0001) {
    return vec2<f32>(0.0, -1.0);
  }
  return v / len;
}

@vertex
fn vs(@location(0) a_position: vec2<f32>, @location(1) a_uv: vec2<f32>) -> VsOut {
  let progress = clamp(u.progress, 0.0, 1.0);
  let release = smoothstep(u.release_range.x, u.release_range.y, progress);
  let collapse = 1.0 - release;

  let dir = safe_normalize(u.direction);
  let normal = vec2<f32>(-dir.y, dir.x);

  let p = clamp(a_position, vec2<f32>(0.0), vec2<f32>(1.0));
  let base_pos = p * u.size;
  let from_origin = base_pos - u.origin_local;

  let lon_origin = dot(from_origin, dir);
  let lat_origin = dot(from_origin, normal);

  let anchor = smoothstep(0.0, 0.28, p.y);
  let head_hold = smoothstep(0.6, 1.0, p.y);
  let neck_curve = pow(p.y, 1.4);

  let base_width = max(u.size.x, 1.0);
  let neck_min = max(1.0, u.neck.x);
  let neck_max = max(neck_min, u.neck.y);
  let head_hold_width = mix(neck_min, base_width * 0.85, neck_curve);
  let collapsed_width = min(neck_max, head_hold_width);
  let half_width = max(base_width * 0.5, 1.0);
  let lat_norm = clamp(lat_origin / half_width, -1.0, 1.0);
  let collapsed_half = max(collapsed_width * 0.5, 1.0);
  let lat_head = half_width * (0.6 + head_hold * 0.25);
  let lat_collapsed = lat_norm * mix(collapsed_half, lat_head, head_hold);
  let lat_expanded = lat_norm * half_width;
  var lat_final = mix(lat_collapsed, lat_expanded, release);

  let lon_pull_scale = mix(0.12, 1.0, pow(anchor, 1.8));
  let bend_pull = u.curve_strength * collapse * pow(1.0 - p.y, 1.85);
  let lon_collapsed = lon_origin * lon_pull_scale - bend_pull;
  let lon_final = mix(lon_collapsed, lon_origin, release);

  let lift = u.curve_strength * collapse * pow(1.0 - p.y, 1.35);
  lat_final -= lift * mix(0.24, 0.04, release);
  lat_final += bend_pull * 0.24 * lat_norm * collapse;

  let pos = u.origin_local + dir * lon_final + normal * lat_final;
  let n = pos / max(u.resolution, vec2<f32>(1.0));

  var o: VsOut;
  o.pos = vec4<f32>(n.x * 2.0 - 1.0, 1.0 - n.y * 2.0, 0.0, 1.0);
  o.uv = clamp(a_uv, vec2<f32>(0.0), vec2<f32>(1.0));
  return o;
}
"#;

/// Fragment stage. Entry point `fs`; samples premultiplied texels and drops near-transparent ones.
pub const FRAGMENT_WGSL: &str = r#"
@group(0) @binding(1) var t_src: texture_2d<f32>;
@group(0) @binding(2) var s_src: sampler;

@fragment
fn fs(@location(0) uv: vec2<f32>) -> @location(0) vec4<f32> {
  let color = textureSample(t_src, s_src, uv);
  if (color.a <= 0.001) {
    discard;
  }
  return color;
}
"#;

/// Texels at or below this alpha are discarded.
pub const ALPHA_DISCARD: f32 = 0.001;

#[cfg(test)]
#[path = "../../tests/unit/render/shader.rs"]
mod tests;
