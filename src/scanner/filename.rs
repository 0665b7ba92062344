use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// Record identifiers extracted from the file path.
#[derive(Debug, Default, PartialEq)]
pub struct ParsedPath {
    pub event: Option<String>,
    pub station: Option<String>,
    pub component: Option<String>,
}

// PEER layout: <event dir>/<station><component>.AT2
// e.g., NORTHR/MUL009.AT2, LOMAP/G03090.AT2, KOBE/KJM-N.AT2
// Component: three-digit azimuth, orientation letters with an optional
// dash prefix, or a spelled-out compass direction.
static AT2_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        (?:^|.*/)
        (?P<event>[^/]+)/
        (?P<station>[^/]+)
        (?P<component>\d{3}|-{0,2}[NSEWTLR]+|NOR|SOU|EAS|WES)
        \.(?i:at2)$",
    )
    .unwrap()
});

/// Parse event, station and component ids from a record path.
pub fn parse_path(path: &Path) -> ParsedPath {
    let text = path.to_string_lossy().replace('\\', "/");

    match AT2_PATH_RE.captures(&text) {
        Some(caps) => ParsedPath {
            event: caps.name("event").map(|m| m.as_str().to_string()),
            station: caps.name("station").map(|m| m.as_str().to_string()),
            component: caps.name("component").map(|m| m.as_str().to_string()),
        },
        None => ParsedPath::default(),
    }
}
