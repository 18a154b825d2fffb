use rand::{seq::IndexedRandom, Rng};

const FIREFOX_VERSIONS: [&str; 10] = [
    "133.0", "132.0", "131.0", "130.0", "129.0", "128.0", "127.0", "126.0", "125.0", "124.0",
];

const CHROME_VERSIONS: [&str; 12] = [
    "133.0.6943.50", "133.0.6943.88", "132.0.6834.83", "132.0.6834.110", "131.0.6778.85",
    "131.0.6778.108", "130.0.6723.92", "130.0.6723.117", "129.0.6668.70", "129.0.6668.89",
    "128.0.6613.120", "128.0.6613.138",
];

const EDGE_VERSIONS: [&str; 8] = [
    "133.0.3048.56", "133.0.3048.46", "132.0.2957.55", "132.0.2957.63", "131.0.2903.86",
    "131.0.2903.112", "130.0.2849.68", "130.0.2849.80",
];

// 報價頁的行動版不含 fin-streamer 節點，因此只模擬桌面瀏覽器
const DESKTOP_OS: [&str; 12] = [
    "Windows NT 10.0; Win64; x64",
    "Windows NT 10.0; Win64; x64",
    "Windows NT 10.0; Win64; x64",
    "Windows NT 10.0; WOW64",
    "Macintosh; Intel Mac OS X 10_15_7",
    "Macintosh; Intel Mac OS X 13_6_9",
    "Macintosh; Intel Mac OS X 14_7_2",
    "Macintosh; Intel Mac OS X 15_2",
    "X11; Linux x86_64",
    "X11; Ubuntu; Linux x86_64",
    "X11; Fedora; Linux x86_64",
    "X11; Debian; Linux x86_64",
];

fn pick<'a>(items: &[&'a str]) -> &'a str {
    items.choose(&mut rand::rng()).copied().unwrap_or_default()
}

fn gen_firefox_ua() -> String {
    let version = pick(&FIREFOX_VERSIONS);
    format!(
        "Mozilla/5.0 ({}; rv:{}) Gecko/20100101 Firefox/{}",
        pick(&DESKTOP_OS),
        version,
        version
    )
}

fn gen_chrome_ua() -> String {
    format!(
        "Mozilla/5.0 ({}) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{} Safari/537.36",
        pick(&DESKTOP_OS),
        pick(&CHROME_VERSIONS)
    )
}

fn gen_edge_ua() -> String {
    let version = pick(&EDGE_VERSIONS);
    let chrome_ver = version.split('.').next().unwrap_or("133");
    // Edge 幾乎只出現在 Windows 與 macOS
    let os = pick(&DESKTOP_OS[..8]);

    format!(
        "Mozilla/5.0 ({}) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{}.0.0.0 Safari/537.36 Edg/{}",
        os, chrome_ver, version
    )
}

fn gen_safari_desktop_ua() -> String {
    let os = pick(&DESKTOP_OS[4..8]);
    let safari_ver = pick(&["18.2", "18.1", "18.0", "17.6"]);

    format!(
        "Mozilla/5.0 ({}) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/{} Safari/605.1.15",
        os, safari_ver
    )
}

pub fn gen_random_ua() -> String {
    let mut rng = rand::rng();
    match rng.random_range(0..20) {
        0..=10 => gen_chrome_ua(),        // 55% Chrome
        11..=14 => gen_firefox_ua(),      // 20% Firefox
        15..=17 => gen_edge_ua(),         // 15% Edge
        _ => gen_safari_desktop_ua(),     // 10% Safari
    }
}
