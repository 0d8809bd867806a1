//! The 64 hexagrams used as card payloads.
//!
//! Lines come straight from the binary value of the zero-based index:
//! bit `j` is line `j` counted from the bottom, 1 = yang (solid).

pub const HEXAGRAM_COUNT: usize = 64;

const NAMES: [&str; HEXAGRAM_COUNT] = [
    "The Creative", "The Receptive", "Difficulty at the Beginning", "Youthful Folly",
    "Waiting", "Conflict", "The Army", "Holding Together",
    "Small Taming", "Treading", "Peace", "Standstill",
    "Fellowship", "Great Possession", "Modesty", "Enthusiasm",
    "Following", "Work on the Decayed", "Approach", "Contemplation",
    "Biting Through", "Grace", "Splitting Apart", "Return",
    "Innocence", "Great Taming", "Mouth Corners", "Great Preponderance",
    "The Abysmal", "The Clinging", "Influence", "Duration",
    "Retreat", "Great Power", "Progress", "Darkening of the Light",
    "The Family", "Opposition", "Obstruction", "Deliverance",
    "Decrease", "Increase", "Breakthrough", "Coming to Meet",
    "Gathering Together", "Pushing Upward", "Oppression", "The Well",
    "Revolution", "The Cauldron", "The Arousing", "The Keeping Still",
    "Development", "The Marrying Maiden", "Abundance", "The Wanderer",
    "The Gentle", "The Joyous", "Dispersion", "Limitation",
    "Inner Truth", "Small Preponderance", "After Completion", "Before Completion",
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hexagram {
    /// 1-based.
    pub number: usize,
    pub name:   String,
    /// Bottom to top; `true` = yang.
    pub lines:  [bool; 6],
}

impl Hexagram {
    pub fn from_index(index: usize) -> Self {
        let mut lines = [false; 6];
        for (j, line) in lines.iter_mut().enumerate() {
            *line = (index >> j) & 1 == 1;
        }
        let name = NAMES
            .get(index)
            .map(|n| n.to_string())
            .unwrap_or_else(|| format!("Hexagram {}", index + 1));
        Hexagram { number: index + 1, name, lines }
    }
}

/// The first `count` hexagrams, in order.
pub fn hexagrams(count: usize) -> Vec<Hexagram> {
    (0..count).map(Hexagram::from_index).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_and_last() {
        let all = hexagrams(HEXAGRAM_COUNT);
        assert_eq!(all.len(), 64);
        assert_eq!(all[0].name, "The Creative");
        assert_eq!(all[0].lines, [false; 6]);
        assert_eq!(all[63].name, "Before Completion");
        assert_eq!(all[63].lines, [true; 6]);
    }

    #[test]
    fn lines_are_bottom_up_bits() {
        // index 5 = 0b000101
        let h = Hexagram::from_index(5);
        assert_eq!(h.number, 6);
        assert_eq!(h.lines, [true, false, true, false, false, false]);
    }

    #[test]
    fn beyond_the_table_gets_a_numbered_name() {
        assert_eq!(Hexagram::from_index(70).name, "Hexagram 71");
    }
}
