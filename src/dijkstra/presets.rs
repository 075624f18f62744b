// Example graphs that can be loaded by index

pub struct Preset {
    pub name: &'static str,
    pub description: &'static str,
    pub nodes: &'static [(&'static str, f64, f64)],
    pub edges: &'static [(&'static str, &'static str, f64)],
    pub start: &'static str,
    pub end: &'static str,
}

pub const PRESETS: &[Preset] = &[
    Preset {
        name: "Simple Path",
        description: "A linear path with 4 nodes",
        nodes: &[
            ("A", 100.0, 250.0),
            ("B", 300.0, 250.0),
            ("C", 500.0, 250.0),
            ("D", 700.0, 250.0),
        ],
        edges: &[("A", "B", 4.0), ("B", "C", 3.0), ("C", "D", 5.0)],
        start: "A",
        end: "D",
    },
    Preset {
        name: "Complex Network",
        description: "A network with multiple paths and nodes",
        nodes: &[
            ("A", 200.0, 200.0),
            ("B", 400.0, 100.0),
            ("C", 400.0, 300.0),
            ("D", 600.0, 100.0),
            ("E", 600.0, 300.0),
            ("F", 800.0, 200.0),
        ],
        edges: &[
            ("A", "B", 4.0),
            ("A", "C", 5.0),
            ("B", "C", 11.0),
            ("B", "D", 9.0),
            ("C", "E", 3.0),
            ("D", "E", 13.0),
            ("D", "F", 2.0),
            ("E", "F", 6.0),
        ],
        start: "A",
        end: "F",
    },
    Preset {
        name: "Large Network",
        description: "A large network with multiple possible paths",
        nodes: &[
            ("A", 100.0, 300.0),
            ("B", 250.0, 200.0),
            ("C", 250.0, 400.0),
            ("D", 400.0, 150.0),
            ("E", 400.0, 300.0),
            ("F", 250.0, 500.0),
            ("G", 550.0, 500.0),
            ("H", 400.0, 400.0),
            ("I", 550.0, 400.0),
            ("J", 700.0, 400.0),
            ("K", 550.0, 300.0),
            ("L", 700.0, 200.0),
            ("M", 550.0, 100.0),
            ("N", 700.0, 500.0),
            ("O", 850.0, 200.0),
            ("P", 850.0, 300.0),
        ],
        edges: &[
            ("A", "B", 5.0),
            ("A", "C", 5.0),
            ("B", "D", 3.0),
            ("B", "C", 4.0),
            ("C", "E", 7.0),
            ("C", "H", 8.0),
            ("D", "M", 14.0),
            ("D", "L", 13.0),
            ("D", "K", 16.0),
            ("E", "F", 4.0),
            ("F", "G", 9.0),
            ("G", "N", 12.0),
            ("H", "I", 3.0),
            ("I", "J", 4.0),
            ("J", "N", 3.0),
            ("K", "P", 4.0),
            ("L", "O", 4.0),
            ("M", "O", 5.0),
            ("N", "P", 7.0),
            ("O", "P", 8.0),
        ],
        start: "A",
        end: "P",
    },
];
