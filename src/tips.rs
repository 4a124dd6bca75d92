//! Prospecting tips shown on the home path.

/// Field lore worth repeating.
pub const TIPS: [&str; 8] = [
    "Gold is often found in quartz veins. Look for white quartz rocks with rusty streaks.",
    "Pyrite (Fool's Gold) forms cubic crystals, whereas real gold is shaped like nuggets or flakes.",
    "Garnets are often found near gold deposits in stream beds as they are both heavy minerals.",
    "Serpentine rock often indicates the presence of nickel, chromium, and platinum group elements.",
    "River bends and the inside of curves are the best places to pan for gold placer deposits.",
    "Black sands (magnetite and hematite) are heavy and often settle in the same places as gold.",
    "Copper ore often stains nearby rocks green (malachite) or blue (azurite).",
    "Silver ore can look like dull, gray tarnished metal and is often heavy for its size.",
];

/// Pick a tip, seeded off the clock so repeated runs vary.
pub fn tip_of_the_day() -> &'static str {
    let seed = crate::gallery::now_ms() as usize;
    TIPS[seed % TIPS.len()]
}
