//! Geometric mouth-shape descriptors consumed by the renderer.

use super::Viseme;
use serde::Serialize;

/// Where the tongue sits when it matters for the shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TonguePosition {
    /// Tip against the ridge behind the upper teeth.
    Ridge,
    /// Tip visible between the teeth.
    BetweenTeeth,
    /// Back of the tongue raised toward the soft palate.
    Back,
    /// Tip curled upward.
    Curled,
}

/// Shape attached 1:1 to a [`Viseme`].
///
/// `jaw_open`, `lip_width` and `lip_round` are normalised to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MouthShape {
    pub jaw_open: f32,
    pub lip_width: f32,
    pub lip_round: f32,
    pub tongue_visible: bool,
    pub teeth_visible: bool,
    pub tongue_position: Option<TonguePosition>,
    pub lower_lip_tuck: bool,
}

impl MouthShape {
    const fn new(jaw_open: f32, lip_width: f32, lip_round: f32) -> Self {
        Self {
            jaw_open,
            lip_width,
            lip_round,
            tongue_visible: false,
            teeth_visible: false,
            tongue_position: None,
            lower_lip_tuck: false,
        }
    }

    const fn teeth(mut self) -> Self {
        self.teeth_visible = true;
        self
    }

    const fn tongue(mut self, position: TonguePosition, visible: bool) -> Self {
        self.tongue_position = Some(position);
        self.tongue_visible = visible;
        self
    }

    const fn lip_tuck(mut self) -> Self {
        self.lower_lip_tuck = true;
        self
    }
}

const REST: MouthShape = MouthShape::new(0.0, 0.5, 0.0);
const AH: MouthShape = MouthShape::new(0.9, 0.6, 0.1).teeth();
const AY: MouthShape = MouthShape::new(0.5, 0.75, 0.0).teeth();
const EH: MouthShape = MouthShape::new(0.5, 0.65, 0.0).teeth();
const EE: MouthShape = MouthShape::new(0.2, 0.9, 0.0).teeth();
const IH: MouthShape = MouthShape::new(0.35, 0.7, 0.0).teeth();
const OH: MouthShape = MouthShape::new(0.6, 0.35, 0.7);
const OO: MouthShape = MouthShape::new(0.25, 0.2, 0.95);
const OU: MouthShape = MouthShape::new(0.55, 0.3, 0.8);
const UH: MouthShape = MouthShape::new(0.45, 0.5, 0.2);
const MBP: MouthShape = MouthShape::new(0.0, 0.45, 0.1);
const FV: MouthShape = MouthShape::new(0.15, 0.55, 0.0).teeth().lip_tuck();
const TH: MouthShape = MouthShape::new(0.2, 0.55, 0.0)
    .teeth()
    .tongue(TonguePosition::BetweenTeeth, true);
const TDN: MouthShape = MouthShape::new(0.25, 0.55, 0.0)
    .teeth()
    .tongue(TonguePosition::Ridge, false);
const L: MouthShape = MouthShape::new(0.35, 0.55, 0.0)
    .teeth()
    .tongue(TonguePosition::Ridge, true);
const SZ: MouthShape = MouthShape::new(0.1, 0.7, 0.0).teeth();
const SHCH: MouthShape = MouthShape::new(0.2, 0.35, 0.6).teeth();
const KG: MouthShape = MouthShape::new(0.4, 0.55, 0.0).tongue(TonguePosition::Back, false);
const R: MouthShape = MouthShape::new(0.3, 0.4, 0.5).tongue(TonguePosition::Curled, false);
const W: MouthShape = MouthShape::new(0.15, 0.15, 1.0);
const Y: MouthShape = MouthShape::new(0.25, 0.75, 0.0).teeth();
const H: MouthShape = MouthShape::new(0.5, 0.55, 0.0);

impl Viseme {
    /// The mouth shape for this viseme.
    pub fn shape(self) -> &'static MouthShape {
        match self {
            Viseme::Rest => &REST,
            Viseme::Ah => &AH,
            Viseme::Ay => &AY,
            Viseme::Eh => &EH,
            Viseme::Ee => &EE,
            Viseme::Ih => &IH,
            Viseme::Oh => &OH,
            Viseme::Oo => &OO,
            Viseme::Ou => &OU,
            Viseme::Uh => &UH,
            Viseme::Mbp => &MBP,
            Viseme::Fv => &FV,
            Viseme::Th => &TH,
            Viseme::Tdn => &TDN,
            Viseme::L => &L,
            Viseme::Sz => &SZ,
            Viseme::ShCh => &SHCH,
            Viseme::Kg => &KG,
            Viseme::R => &R,
            Viseme::W => &W,
            Viseme::Y => &Y,
            Viseme::H => &H,
        }
    }
}
