//! Static catalog of names accepted by the YouTube Analytics reporting API.
//!
//! Metric groups are ordered slices; `ALL_METRICS_ORDERED` is the canonical
//! column order used when a query asks for no metrics at all.

use std::collections::HashSet;

use once_cell::sync::Lazy;

pub const ALL_DIMENSIONS: &[&str] = &[
    "video", "playlist", "channel", "country", "province", "city", "day", "month",
    "insightPlaybackLocationType", "insightPlaybackLocationDetail", "liveOrOnDemand",
    "subscribedStatus", "youtubeProduct", "insightTrafficSourceType",
    "insightTrafficSourceDetail", "deviceType", "operatingSystem", "ageGroup", "gender",
    "sharingService", "elapsedVideoTimeRatio", "audienceType", "adType", "claimedStatus",
    "uploaderType", "creatorContentType",
];

pub const ALL_FILTERS: &[&str] = &[
    "video", "playlist", "channel", "group", "country", "province", "continent",
    "subContinent", "day", "month", "insightPlaybackLocationType",
    "insightPlaybackLocationDetail", "liveOrOnDemand", "subscribedStatus", "youtubeProduct",
    "insightTrafficSourceType", "insightTrafficSourceDetail", "deviceType", "operatingSystem",
    "ageGroup", "gender", "sharingService", "elapsedVideoTimeRatio", "audienceType", "adType",
    "claimedStatus", "uploaderType", "isCurated",
];

pub const ALL_METRICS_ORDERED: &[&str] = &[
    "views",
    "redViews",
    "comments",
    "likes",
    "dislikes",
    "videosAddedToPlaylists",
    "videosRemovedFromPlaylists",
    "shares",
    "estimatedMinutesWatched",
    "estimatedRedMinutesWatched",
    "averageViewDuration",
    "averageViewPercentage",
    "annotationClickThroughRate",
    "annotationCloseRate",
    "annotationImpressions",
    "annotationClickableImpressions",
    "annotationClosableImpressions",
    "annotationClicks",
    "annotationCloses",
    "cardClickRate",
    "cardTeaserClickRate",
    "cardImpressions",
    "cardTeaserImpressions",
    "cardClicks",
    "cardTeaserClicks",
    "subscribersGained",
    "subscribersLost",
    "estimatedRevenue",
    "estimatedAdRevenue",
    "grossRevenue",
    "estimatedRedPartnerRevenue",
    "monetizedPlaybacks",
    "playbackBasedCpm",
    "adImpressions",
    "cpm",
    "viewerPercentage",
    "audienceWatchRatio",
    "relativeRetentionPerformance",
    "playlistStarts",
    "viewsPerPlaylistStart",
    "averageTimeInPlaylist",
];

/// Metrics that require the monetary scope.
pub const REVENUE_METRICS: &[&str] = &[
    "estimatedRevenue",
    "estimatedAdRevenue",
    "grossRevenue",
    "estimatedRedPartnerRevenue",
    "monetizedPlaybacks",
    "playbackBasedCpm",
    "adImpressions",
    "cpm",
];

pub const ALL_VIDEO_METRICS: &[&str] = &[
    "views",
    "redViews",
    "comments",
    "likes",
    "dislikes",
    "videosAddedToPlaylists",
    "videosRemovedFromPlaylists",
    "shares",
    "estimatedMinutesWatched",
    "estimatedRedMinutesWatched",
    "averageViewDuration",
    "averageViewPercentage",
    "annotationClickThroughRate",
    "annotationCloseRate",
    "annotationImpressions",
    "annotationClickableImpressions",
    "annotationClosableImpressions",
    "annotationClicks",
    "annotationCloses",
    "cardClickRate",
    "cardTeaserClickRate",
    "cardImpressions",
    "cardTeaserImpressions",
    "cardClicks",
    "cardTeaserClicks",
    "subscribersGained",
    "subscribersLost",
    "estimatedRevenue",
    "estimatedAdRevenue",
    "grossRevenue",
    "estimatedRedPartnerRevenue",
    "monetizedPlaybacks",
    "playbackBasedCpm",
    "adImpressions",
    "cpm",
];

pub const ALL_PROVINCE_METRICS: &[&str] = &[
    "views",
    "redViews",
    "estimatedMinutesWatched",
    "estimatedRedMinutesWatched",
    "averageViewDuration",
    "averageViewPercentage",
    "annotationClickThroughRate",
    "annotationCloseRate",
    "annotationImpressions",
    "annotationClickableImpressions",
    "annotationClosableImpressions",
    "annotationClicks",
    "annotationCloses",
    "cardClickRate",
    "cardTeaserClickRate",
    "cardImpressions",
    "cardTeaserImpressions",
    "cardClicks",
    "cardTeaserClicks",
];

pub const SUBSCRIPTION_METRICS: &[&str] = &[
    "views",
    "redViews",
    "likes",
    "dislikes",
    "videosAddedToPlaylists",
    "videosRemovedFromPlaylists",
    "shares",
    "estimatedMinutesWatched",
    "estimatedRedMinutesWatched",
    "averageViewDuration",
    "averageViewPercentage",
    "annotationClickThroughRate",
    "annotationCloseRate",
    "annotationImpressions",
    "annotationClickableImpressions",
    "annotationClosableImpressions",
    "annotationClicks",
    "annotationCloses",
    "cardClickRate",
    "cardTeaserClickRate",
    "cardImpressions",
    "cardTeaserImpressions",
    "cardClicks",
    "cardTeaserClicks",
];

/// Identical to [`ALL_PROVINCE_METRICS`].
pub const LESSER_SUBSCRIPTION_METRICS: &[&str] = ALL_PROVINCE_METRICS;

pub const LIVE_PLAYBACK_DETAIL_METRICS: &[&str] = &[
    "views",
    "redViews",
    "estimatedMinutesWatched",
    "estimatedRedMinutesWatched",
    "averageViewDuration",
];

pub const VIEW_PERCENTAGE_PLAYBACK_DETAIL_METRICS: &[&str] = &[
    "views",
    "redViews",
    "estimatedMinutesWatched",
    "estimatedRedMinutesWatched",
    "averageViewDuration",
    "averageViewPercentage",
];

pub const LOCATION_AND_TRAFFIC_METRICS: &[&str] = &["views", "estimatedMinutesWatched"];

pub const ALL_PLAYLIST_METRICS: &[&str] = &[
    "views",
    "redViews",
    "estimatedMinutesWatched",
    "estimatedRedMinutesWatched",
    "averageViewDuration",
    "playlistStarts",
    "viewsPerPlaylistStart",
    "averageTimeInPlaylist",
];

pub const LOCATION_AND_TRAFFIC_PLAYLIST_METRICS: &[&str] = &[
    "views",
    "estimatedMinutesWatched",
    "playlistStarts",
    "viewsPerPlaylistStart",
    "averageTimeInPlaylist",
];

pub const CITY_METRICS: &[&str] = &[
    "views",
    "estimatedMinutesWatched",
    "averageViewDuration",
    "averageViewPercentage",
];

pub const VIEWER_DEMOGRAPHICS_METRICS: &[&str] = &["viewerPercentage"];
pub const SHARING_METRICS: &[&str] = &["shares"];
pub const AUDIENCE_RETENTION_METRICS: &[&str] = &["audienceWatchRatio", "relativeRetentionPerformance"];
pub const AD_PERFORMANCE_METRICS: &[&str] = &["grossRevenue", "adImpressions", "cpm"];

pub const LOCATION_AND_TRAFFIC_SORT_OPTIONS: &[&str] = &["views", "estimatedMinutesWatched"];

pub const TOP_VIDEOS_SORT_OPTIONS: &[&str] = &[
    "views",
    "redViews",
    "estimatedMinutesWatched",
    "estimatedRedMinutesWatched",
];

pub const TOP_VIDEOS_EXTRA_SORT_OPTIONS: &[&str] = &[
    "views",
    "redViews",
    "estimatedRevenue",
    "estimatedRedPartnerRevenue",
    "estimatedMinutesWatched",
    "estimatedRedMinutesWatched",
    "subscribersGained",
    "subscribersLost",
];

pub const LOCATION_AND_TRAFFIC_PLAYLIST_SORT_OPTIONS: &[&str] =
    &["views", "estimatedMinutesWatched", "playlistStarts"];

pub const COUNTRIES: &[&str] = &[
    "AD", "AE", "AF", "AG", "AI", "AL", "AM", "AO", "AQ", "AR", "AS", "AT",
    "AU", "AW", "AX", "AZ", "BA", "BB", "BD", "BE", "BF", "BG", "BH", "BI",
    "BJ", "BL", "BM", "BN", "BO", "BQ", "BR", "BS", "BT", "BV", "BW", "BY",
    "BZ", "CA", "CC", "CD", "CF", "CG", "CH", "CI", "CK", "CL", "CM", "CN",
    "CO", "CR", "CU", "CV", "CW", "CX", "CY", "CZ", "DE", "DJ", "DK", "DM",
    "DO", "DZ", "EC", "EE", "EG", "EH", "ER", "ES", "ET", "FI", "FJ", "FK",
    "FM", "FO", "FR", "GA", "GB", "GD", "GE", "GF", "GG", "GH", "GI", "GL",
    "GM", "GN", "GP", "GQ", "GR", "GS", "GT", "GU", "GW", "GY", "HK", "HM",
    "HN", "HR", "HT", "HU", "ID", "IE", "IL", "IM", "IN", "IO", "IQ", "IR",
    "IS", "IT", "JE", "JM", "JO", "JP", "KE", "KG", "KH", "KI", "KM", "KN",
    "KP", "KR", "KW", "KY", "KZ", "LA", "LB", "LC", "LI", "LK", "LR", "LS",
    "LT", "LU", "LV", "LY", "MA", "MC", "MD", "ME", "MF", "MG", "MH", "MK",
    "ML", "MM", "MN", "MO", "MP", "MQ", "MR", "MS", "MT", "MU", "MV", "MW",
    "MX", "MY", "MZ", "NA", "NC", "NE", "NF", "NG", "NI", "NL", "NO", "NP",
    "NR", "NU", "NZ", "OM", "PA", "PE", "PF", "PG", "PH", "PK", "PL", "PM",
    "PN", "PR", "PS", "PT", "PW", "PY", "QA", "RE", "RO", "RS", "RU", "RW",
    "SA", "SB", "SC", "SD", "SE", "SG", "SH", "SI", "SJ", "SK", "SL", "SM",
    "SN", "SO", "SR", "SS", "ST", "SV", "SX", "SY", "SZ", "TC", "TD", "TF",
    "TG", "TH", "TJ", "TK", "TL", "TM", "TN", "TO", "TR", "TT", "TV", "TW",
    "TZ", "UA", "UG", "UM", "US", "UY", "UZ", "VA", "VC", "VE", "VG", "VI",
    "VN", "VU", "WF", "WS", "YE", "YT", "ZA", "ZM", "ZW",
];

pub const SUBDIVISIONS: &[&str] = &[
    "US-AK", "US-AL", "US-AR", "US-AS", "US-AZ", "US-CA", "US-CO", "US-CT", "US-DC", "US-DE",
    "US-FL", "US-GA", "US-GU", "US-HI", "US-IA", "US-ID", "US-IL", "US-IN", "US-KS", "US-KY",
    "US-LA", "US-MA", "US-MD", "US-ME", "US-MI", "US-MN", "US-MO", "US-MP", "US-MS", "US-MT",
    "US-NC", "US-ND", "US-NE", "US-NH", "US-NJ", "US-NM", "US-NV", "US-NY", "US-OH", "US-OK",
    "US-OR", "US-PA", "US-PR", "US-RI", "US-SC", "US-SD", "US-TN", "US-TX", "US-UM", "US-UT",
    "US-VA", "US-VI", "US-VT", "US-WA", "US-WI", "US-WV", "US-WY",
];

pub const CURRENCIES: &[&str] = &[
    "AED", "AFN", "ALL", "AMD", "ANG", "AOA", "ARS", "AUD", "AWG", "AZN", "BAM", "BBD",
    "BDT", "BGN", "BHD", "BIF", "BMD", "BND", "BOB", "BRL", "BSD", "BTN", "BWP", "BYN",
    "BZD", "CAD", "CDF", "CHF", "CLP", "CNY", "COP", "CRC", "CUC", "CUP", "CVE", "CZK",
    "DJF", "DKK", "DOP", "DZD", "EGP", "ERN", "ETB", "EUR", "FJD", "FKP", "GBP", "GEL",
    "GHS", "GIP", "GMD", "GNF", "GTQ", "GYD", "HKD", "HNL", "HRK", "HTG", "HUF", "IDR",
    "ILS", "INR", "IQD", "IRR", "ISK", "JMD", "JOD", "JPY", "KES", "KGS", "KHR", "KMF",
    "KPW", "KRW", "KWD", "KYD", "KZT", "LAK", "LBP", "LKR", "LRD", "LSL", "LYD", "MAD",
    "MDL", "MGA", "MKD", "MMK", "MNT", "MOP", "MRO", "MUR", "MVR", "MWK", "MXN", "MYR",
    "MZN", "NAD", "NGN", "NIO", "NOK", "NPR", "NZD", "OMR", "PAB", "PEN", "PGK", "PHP",
    "PKR", "PLN", "PYG", "QAR", "RON", "RSD", "RUB", "RWF", "SAR", "SBD", "SCR", "SDG",
    "SEK", "SGD", "SHP", "SLL", "SOS", "SRD", "SSP", "STD", "SVC", "SYP", "SZL", "THB",
    "TJS", "TMT", "TND", "TOP", "TRY", "TTD", "TWD", "TZS", "UAH", "UGX", "USD", "UYU",
    "UZS", "VEF", "VND", "VUV", "WST", "XAF", "XAG", "XAU", "XBA", "XBB", "XBC", "XBD",
    "XCD", "XDR", "XOF", "XPD", "XPF", "XPT", "XSU", "XTS", "XUA", "XXX", "YER", "ZAR",
    "ZMW", "ZWL",
];

const CONTINENT_VALUES: &[&str] = &[
    "002", "019", "142", "150", "009",
];

const SUB_CONTINENT_VALUES: &[&str] = &[
    "014", "017", "015", "018", "011", "029", "013", "021",
    "005", "143", "030", "034", "035", "145", "151", "154",
    "039", "155", "053", "054", "057", "061",
];

const INSIGHT_PLAYBACK_LOCATION_TYPE_VALUES: &[&str] = &[
    "BROWSE", "CHANNEL", "EMBEDDED", "EXTERNAL_APP", "MOBILE", "SEARCH",
    "WATCH", "YT_OTHER",
];

const LIVE_OR_ON_DEMAND_VALUES: &[&str] = &[
    "LIVE", "ON_DEMAND",
];

const SUBSCRIBED_STATUS_VALUES: &[&str] = &[
    "SUBSCRIBED", "UNSUBSCRIBED",
];

const YOUTUBE_PRODUCT_VALUES: &[&str] = &[
    "CORE", "GAMING", "KIDS", "UNKNOWN",
];

const INSIGHT_TRAFFIC_SOURCE_TYPE_VALUES: &[&str] = &[
    "ADVERTISING", "ANNOTATION", "CAMPAIGN_CARD", "END_SCREEN", "EXT_URL", "NO_LINK_EMBEDDED",
    "NO_LINK_OTHER", "NOTIFICATION", "PLAYLIST", "PROMOTED", "RELATED_VIDEO", "SHORTS",
    "SUBSCRIBER", "YT_CHANNEL", "YT_OTHER_PAGE", "YT_PLAYLIST_PAGE", "YT_SEARCH",
];

const INSIGHT_TRAFFIC_SOURCE_DETAIL_VALUES: &[&str] = &[
    "ADVERTISING", "CAMPAIGN_CARD", "END_SCREEN", "EXT_URL", "NOTIFICATION", "RELATED_VIDEO",
    "SUBSCRIBER", "YT_CHANNEL", "YT_OTHER_PAGE", "YT_SEARCH",
];

const DEVICE_TYPE_VALUES: &[&str] = &[
    "DESKTOP", "GAME_CONSOLE", "MOBILE", "TABLET", "TV", "UNKNOWN_PLATFORM",
];

const OPERATING_SYSTEM_VALUES: &[&str] = &[
    "ANDROID", "BADA", "BLACKBERRY", "CHROMECAST", "DOCOMO", "FIREFOX",
    "HIPTOP", "IOS", "KAIOS", "LINUX", "MACINTOSH", "MEEGO",
    "NINTENDO_3DS", "OTHER", "PLAYSTATION", "PLAYSTATION_VITA", "REALMEDIA", "SMART_TV",
    "SYMBIAN", "TIZEN", "WEBOS", "WII", "WINDOWS", "WINDOWS_MOBILE",
    "XBOX",
];

const AGE_GROUP_VALUES: &[&str] = &[
    "age13-17", "age18-24", "age25-34", "age35-44", "age45-54", "age55-64", "age65-",
];

const GENDER_VALUES: &[&str] = &[
    "female", "male", "user_specified",
];

const SHARING_SERVICE_VALUES: &[&str] = &[
    "AMEBA", "ANDROID_EMAIL", "ANDROID_MESSENGER", "ANDROID_MMS", "BBM", "BLOGGER",
    "COPY_PASTE", "CYWORLD", "DIGG", "DROPBOX", "EMBED", "MAIL",
    "FACEBOOK", "FACEBOOK_MESSENGER", "FACEBOOK_PAGES", "FOTKA", "GMAIL", "GOO",
    "GOOGLEPLUS", "GO_SMS", "GROUPME", "HANGOUTS", "HI5", "HTC_MMS",
    "INBOX", "IOS_SYSTEM_ACTIVITY_DIALOG", "KAKAO_STORY", "KAKAO", "KIK", "LGE_EMAIL",
    "LINE", "LINKEDIN", "LIVEJOURNAL", "MENEAME", "MIXI", "MOTOROLA_MESSAGING",
    "MYSPACE", "NAVER", "NEARBY_SHARE", "NUJIJ", "ODNOKLASSNIKI", "OTHER",
    "PINTEREST", "RAKUTEN", "REDDIT", "SKYPE", "SKYBLOG", "SONY_CONVERSATIONS",
    "STUMBLEUPON", "TELEGRAM", "TEXT_MESSAGE", "TUENTI", "TUMBLR", "TWITTER",
    "UNKNOWN", "VERIZON_MMS", "VIBER", "VKONTATKE", "WECHAT", "WEIBO",
    "WHATS_APP", "WYKOP", "YAHOO", "YOUTUBE_GAMING", "YOUTUBE_KIDS", "YOUTUBE_MUSIC",
    "YOUTUBE_TV",
];

const AUDIENCE_TYPE_VALUES: &[&str] = &[
    "ORGANIC", "AD_INSTREAM", "AD_INDISPLAY",
];

const AD_TYPE_VALUES: &[&str] = &[
    "auctionBumperInstream", "auctionDisplay", "auctionInstream", "auctionTrueviewInslate", "auctionTrueviewInstream", "auctionUnknown",
    "reservedBumperInstream", "reservedClickToPlay", "reservedDisplay", "reservedInstream", "reservedInstreamSelect", "reservedMasthead",
    "reservedUnknown", "unknown",
];

const CLAIMED_STATUS_VALUES: &[&str] = &[
    "claimed",
];

const UPLOADER_TYPE_VALUES: &[&str] = &[
    "self", "thirdParty",
];

const IS_CURATED_VALUES: &[&str] = &[
    "1",
];

static DIMENSION_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ALL_DIMENSIONS.iter().copied().collect());
static FILTER_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ALL_FILTERS.iter().copied().collect());
static METRIC_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ALL_METRICS_ORDERED.iter().copied().collect());
static CURRENCY_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| CURRENCIES.iter().copied().collect());

/// `0.01` through `1.0`, rendered the way the API echoes them.
static ELAPSED_VIDEO_TIME_RATIOS: Lazy<HashSet<String>> =
    Lazy::new(|| (1..=100).map(|n| format!("{:?}", n as f64 / 100.0)).collect());

pub fn is_dimension(name: &str) -> bool {
    DIMENSION_SET.contains(name)
}

pub fn is_filter(name: &str) -> bool {
    FILTER_SET.contains(name)
}

pub fn is_metric(name: &str) -> bool {
    METRIC_SET.contains(name)
}

pub fn is_currency(code: &str) -> bool {
    CURRENCY_SET.contains(code)
}

pub fn is_revenue_metric(name: &str) -> bool {
    REVENUE_METRICS.contains(&name)
}

/// Legal values for an enumerated filter. `None` means the filter takes a
/// free-form value (ids, dates) or is unknown.
fn enumerated_values(key: &str) -> Option<&'static [&'static str]> {
    let values = match key {
        "country" => COUNTRIES,
        "province" => SUBDIVISIONS,
        "continent" => CONTINENT_VALUES,
        "subContinent" => SUB_CONTINENT_VALUES,
        "insightPlaybackLocationType" => INSIGHT_PLAYBACK_LOCATION_TYPE_VALUES,
        "liveOrOnDemand" => LIVE_OR_ON_DEMAND_VALUES,
        "subscribedStatus" => SUBSCRIBED_STATUS_VALUES,
        "youtubeProduct" => YOUTUBE_PRODUCT_VALUES,
        "insightTrafficSourceType" => INSIGHT_TRAFFIC_SOURCE_TYPE_VALUES,
        "insightTrafficSourceDetail" => INSIGHT_TRAFFIC_SOURCE_DETAIL_VALUES,
        "deviceType" => DEVICE_TYPE_VALUES,
        "operatingSystem" => OPERATING_SYSTEM_VALUES,
        "ageGroup" => AGE_GROUP_VALUES,
        "gender" => GENDER_VALUES,
        "sharingService" => SHARING_SERVICE_VALUES,
        "audienceType" => AUDIENCE_TYPE_VALUES,
        "adType" => AD_TYPE_VALUES,
        "claimedStatus" => CLAIMED_STATUS_VALUES,
        "uploaderType" => UPLOADER_TYPE_VALUES,
        "isCurated" => IS_CURATED_VALUES,
        _ => return None,
    };
    Some(values)
}

/// Check a filter value against the legal values for its key. Unknown
/// keys are reported separately by the caller.
pub fn is_valid_filter_value(key: &str, value: &str) -> bool {
    if key == "elapsedVideoTimeRatio" {
        return ELAPSED_VIDEO_TIME_RATIOS.contains(value);
    }
    match enumerated_values(key) {
        Some(values) => values.contains(&value),
        None => true,
    }
}

/// Traffic source types that have per-source detail data.
pub fn has_traffic_source_detail(source_type: &str) -> bool {
    INSIGHT_TRAFFIC_SOURCE_DETAIL_VALUES.contains(&source_type)
}
