//! Benchmark positions: hand-picked middlegame boards that exercise the
//! evaluator, the threat layer and the solvers in different proportions.

use board::stone::Stone;

pub struct Preset {
    pub name: &'static str,
    pub side: Stone,
    pub diagram: &'static str,
}

impl Preset {
    pub fn all_presets() -> &'static [Preset] {
        PRESETS
    }

    pub fn by_name(name: &str) -> Option<&'static Preset> {
        PRESETS.iter().find(|preset| preset.name == name)
    }
}

static PRESETS: &[Preset] = &[
    Preset {
        name: "opening",
        side: Stone::White,
        diagram: "
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . x . . . . . . .
            . . . . . . o x . . . . . . .
            . . . . . . . o . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
        ",
    },
    Preset {
        name: "midgame",
        side: Stone::Black,
        diagram: "
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . o . . . . . . .
            . . . . . o x x . . . . . . .
            . . . . . x o x o . . . . . .
            . . . . o x x o . . . . . . .
            . . . . . x o . . . . . . . .
            . . . . o . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
        ",
    },
    Preset {
        name: "tactics",
        side: Stone::Black,
        diagram: "
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . x . . . . . . .
            . . . . . o . x . . . . . . .
            . . . . . . o x . . . . . . .
            . . . . x x . . o . . . . . .
            . . . . . . o . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
        ",
    },
    Preset {
        name: "defence",
        side: Stone::White,
        diagram: "
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . x . . . . . . . .
            . . . . . . x o . . . . . . .
            . . . . . . x o . . . . . . .
            . . . . . . . . o . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
        ",
    },
];
