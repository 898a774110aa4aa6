//! Report type descriptors.
//!
//! Every report shape the API supports is a [`ReportKind`]. Its rules live
//! in a [`ReportType`] built by [`ReportKind::descriptor`]; [`ReportKind::ALL`]
//! lists the kinds in resolution order, narrower shapes first.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::QueryError;
use crate::reports::data;
use crate::reports::features::{Dimensions, Filters, Metrics, SetRule, SortOptions};

/// Ceiling the API applies to city reports, despite documenting 250.
const CITY_RESULT_CEILING: u32 = 25;
const DETAIL_RESULT_CEILING: u32 = 25;
const TOP_RESULT_CEILING: u32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReportKind {
    BasicUserActivity,
    BasicUserActivityUs,
    TimeBasedActivity,
    TimeBasedActivityUs,
    PlaybackDetailsSubscribedStatus,
    PlaybackDetailsSubscribedStatusUs,
    PlaybackDetailsViewPercentageTimeBased,
    PlaybackDetailsLiveTimeBased,
    GeographyBasedActivity,
    PlaybackDetailsViewPercentageGeographyBased,
    PlaybackDetailsLiveGeographyBased,
    GeographyBasedActivityUs,
    PlaybackDetailsViewPercentageGeographyBasedUs,
    PlaybackDetailsLiveGeographyBasedUs,
    GeographyBasedActivityByCity,
    PlaybackLocation,
    PlaybackLocationDetail,
    TrafficSource,
    TrafficSourceDetail,
    DeviceType,
    OperatingSystem,
    DeviceTypeAndOperatingSystem,
    ViewerDemographics,
    EngagementAndContentSharing,
    AudienceRetention,
    AdPerformance,
    TopVideosUs,
    TopVideosRegional,
    TopVideosSubscribed,
    TopVideosYouTubeProduct,
    TopVideosPlaybackDetail,
    BasicUserActivityPlaylist,
    TimeBasedActivityPlaylist,
    GeographyBasedActivityPlaylist,
    GeographyBasedActivityUsPlaylist,
    PlaybackLocationPlaylist,
    PlaybackLocationDetailPlaylist,
    TrafficSourcePlaylist,
    TrafficSourceDetailPlaylist,
    DeviceTypePlaylist,
    OperatingSystemPlaylist,
    DeviceTypeAndOperatingSystemPlaylist,
    ViewerDemographicsPlaylist,
    TopPlaylists,
}

impl ReportKind {
    /// Every kind, in resolution order.
    pub const ALL: [ReportKind; 44] = [
        ReportKind::BasicUserActivity,
        ReportKind::BasicUserActivityUs,
        ReportKind::TimeBasedActivity,
        ReportKind::TimeBasedActivityUs,
        ReportKind::PlaybackDetailsSubscribedStatus,
        ReportKind::PlaybackDetailsSubscribedStatusUs,
        ReportKind::PlaybackDetailsViewPercentageTimeBased,
        ReportKind::PlaybackDetailsLiveTimeBased,
        ReportKind::GeographyBasedActivity,
        ReportKind::PlaybackDetailsViewPercentageGeographyBased,
        ReportKind::PlaybackDetailsLiveGeographyBased,
        ReportKind::GeographyBasedActivityUs,
        ReportKind::PlaybackDetailsViewPercentageGeographyBasedUs,
        ReportKind::PlaybackDetailsLiveGeographyBasedUs,
        ReportKind::GeographyBasedActivityByCity,
        ReportKind::PlaybackLocation,
        ReportKind::PlaybackLocationDetail,
        ReportKind::TrafficSource,
        ReportKind::TrafficSourceDetail,
        ReportKind::DeviceType,
        ReportKind::OperatingSystem,
        ReportKind::DeviceTypeAndOperatingSystem,
        ReportKind::ViewerDemographics,
        ReportKind::EngagementAndContentSharing,
        ReportKind::AudienceRetention,
        ReportKind::AdPerformance,
        ReportKind::TopVideosUs,
        ReportKind::TopVideosRegional,
        ReportKind::TopVideosSubscribed,
        ReportKind::TopVideosYouTubeProduct,
        ReportKind::TopVideosPlaybackDetail,
        ReportKind::BasicUserActivityPlaylist,
        ReportKind::TimeBasedActivityPlaylist,
        ReportKind::GeographyBasedActivityPlaylist,
        ReportKind::GeographyBasedActivityUsPlaylist,
        ReportKind::PlaybackLocationPlaylist,
        ReportKind::PlaybackLocationDetailPlaylist,
        ReportKind::TrafficSourcePlaylist,
        ReportKind::TrafficSourceDetailPlaylist,
        ReportKind::DeviceTypePlaylist,
        ReportKind::OperatingSystemPlaylist,
        ReportKind::DeviceTypeAndOperatingSystemPlaylist,
        ReportKind::ViewerDemographicsPlaylist,
        ReportKind::TopPlaylists,
    ];

    /// Human-readable name, as used in log output and error reports.
    pub fn name(self) -> &'static str {
        use ReportKind::*;
        match self {
            BasicUserActivity => "Basic user activity",
            BasicUserActivityUs => "Basic user activity (US)",
            TimeBasedActivity => "Time-based activity",
            TimeBasedActivityUs => "Time-based activity (US)",
            PlaybackDetailsSubscribedStatus => "User activity by subscribed status",
            PlaybackDetailsSubscribedStatusUs => "User activity by subscribed status (US)",
            PlaybackDetailsViewPercentageTimeBased => {
                "Time-based playback details (view percentage)"
            }
            PlaybackDetailsLiveTimeBased => "Time-based playback details (live)",
            GeographyBasedActivity => "Geography-based activity",
            PlaybackDetailsViewPercentageGeographyBased => {
                "Geography-based playback details (view percentage)"
            }
            PlaybackDetailsLiveGeographyBased => "Geography-based playback details (live)",
            GeographyBasedActivityUs => "Geography-based activity (US)",
            PlaybackDetailsViewPercentageGeographyBasedUs => {
                "Geography-based playback details (view percentage, US)"
            }
            PlaybackDetailsLiveGeographyBasedUs => "Geography-based playback details (live, US)",
            GeographyBasedActivityByCity => "Geography-based activity (by city)",
            PlaybackLocation => "Playback locations",
            PlaybackLocationDetail => "Playback locations (detailed)",
            TrafficSource => "Traffic sources",
            TrafficSourceDetail => "Traffic sources (detailed)",
            DeviceType => "Device types",
            OperatingSystem => "Operating systems",
            DeviceTypeAndOperatingSystem => "Device types and operating systems",
            ViewerDemographics => "Viewer demographics",
            EngagementAndContentSharing => "Engagement and content sharing",
            AudienceRetention => "Audience retention",
            AdPerformance => "Ad performance",
            TopVideosUs => "Top videos by state",
            TopVideosRegional => "Top videos by region",
            TopVideosSubscribed => "Top videos by subscription status",
            TopVideosYouTubeProduct => "Top videos by YouTube product",
            TopVideosPlaybackDetail => "Top videos by playback detail",
            BasicUserActivityPlaylist => "Basic user activity for playlists",
            TimeBasedActivityPlaylist => "Time-based activity for playlists",
            GeographyBasedActivityPlaylist => "Geography-based activity for playlists",
            GeographyBasedActivityUsPlaylist => "Geography-based activity for playlists (US)",
            PlaybackLocationPlaylist => "Playback locations for playlists",
            PlaybackLocationDetailPlaylist => "Playback locations for playlists (detailed)",
            TrafficSourcePlaylist => "Traffic sources for playlists",
            TrafficSourceDetailPlaylist => "Traffic sources for playlists (detailed)",
            DeviceTypePlaylist => "Device types for playlists",
            OperatingSystemPlaylist => "Operating systems for playlists",
            DeviceTypeAndOperatingSystemPlaylist => {
                "Device types and operating systems for playlists"
            }
            ViewerDemographicsPlaylist => "Viewer demographics for playlists",
            TopPlaylists => "Top playlists",
        }
    }

    pub fn is_playlist(self) -> bool {
        self >= ReportKind::BasicUserActivityPlaylist
    }

    /// Build the rule set for this kind.
    pub fn descriptor(self) -> ReportType {
        use ReportKind::*;

        // Filter groups shared by most video and playlist shapes.
        const REGION: &[&str] = &["country", "continent", "subContinent"];
        const ANY_REGION: &[&str] = &["country", "province", "continent", "subContinent"];
        const CONTINENTAL: &[&str] = &["continent", "subContinent"];
        const VIDEO_OR_GROUP: &[&str] = &["video", "group"];
        const PLAYLIST_OR_GROUP: &[&str] = &["playlist", "group"];
        const DAY_OR_MONTH: &[&str] = &["day", "month"];
        const CONTENT_TYPE: &[&str] = &["creatorContentType"];
        const CURATED: &[&str] = &["isCurated==1"];

        let simple = |dimensions: Vec<SetRule>,
                      filters: Vec<SetRule>,
                      metrics: &'static [&'static str]| {
            ReportType::new(self, dimensions, filters, metrics, SortOptions::new(metrics))
        };

        match self {
            BasicUserActivity => simple(
                vec![],
                vec![SetRule::zero_or_one(REGION), SetRule::zero_or_one(VIDEO_OR_GROUP)],
                data::ALL_VIDEO_METRICS,
            ),
            BasicUserActivityUs => simple(
                vec![],
                vec![
                    SetRule::required(&["province"]),
                    SetRule::zero_or_one(VIDEO_OR_GROUP),
                ],
                data::ALL_PROVINCE_METRICS,
            ),
            TimeBasedActivity => simple(
                vec![
                    SetRule::exactly_one(DAY_OR_MONTH),
                    SetRule::optional(CONTENT_TYPE),
                ],
                vec![SetRule::zero_or_one(REGION), SetRule::zero_or_one(VIDEO_OR_GROUP)],
                data::ALL_VIDEO_METRICS,
            ),
            TimeBasedActivityUs => simple(
                vec![
                    SetRule::exactly_one(DAY_OR_MONTH),
                    SetRule::optional(CONTENT_TYPE),
                ],
                vec![
                    SetRule::required(&["province"]),
                    SetRule::zero_or_one(VIDEO_OR_GROUP),
                ],
                data::ALL_PROVINCE_METRICS,
            ),
            PlaybackDetailsSubscribedStatus => simple(
                vec![
                    SetRule::zero_or_more(&["creatorContentType", "subscribedStatus"]),
                    SetRule::zero_or_one(DAY_OR_MONTH),
                ],
                vec![
                    SetRule::zero_or_one(REGION),
                    SetRule::zero_or_one(VIDEO_OR_GROUP),
                    SetRule::optional(&["subscribedStatus"]),
                ],
                data::SUBSCRIPTION_METRICS,
            ),
            PlaybackDetailsSubscribedStatusUs => simple(
                vec![
                    SetRule::zero_or_more(&["creatorContentType", "subscribedStatus"]),
                    SetRule::zero_or_one(DAY_OR_MONTH),
                ],
                vec![
                    SetRule::zero_or_one(VIDEO_OR_GROUP),
                    SetRule::zero_or_more(&["province", "subscribedStatus"]),
                ],
                data::LESSER_SUBSCRIPTION_METRICS,
            ),
            PlaybackDetailsViewPercentageTimeBased => simple(
                vec![
                    SetRule::zero_or_more(&[
                        "creatorContentType",
                        "subscribedStatus",
                        "youtubeProduct",
                    ]),
                    SetRule::zero_or_one(DAY_OR_MONTH),
                ],
                vec![
                    SetRule::zero_or_one(ANY_REGION),
                    SetRule::zero_or_one(VIDEO_OR_GROUP),
                    SetRule::zero_or_more(&["subscribedStatus", "youtubeProduct"]),
                ],
                data::VIEW_PERCENTAGE_PLAYBACK_DETAIL_METRICS,
            ),
            PlaybackDetailsLiveTimeBased => simple(
                vec![
                    SetRule::zero_or_more(&[
                        "creatorContentType",
                        "liveOrOnDemand",
                        "subscribedStatus",
                        "youtubeProduct",
                    ]),
                    SetRule::zero_or_one(DAY_OR_MONTH),
                ],
                vec![
                    SetRule::zero_or_one(ANY_REGION),
                    SetRule::zero_or_one(VIDEO_OR_GROUP),
                    SetRule::zero_or_more(&["liveOrOnDemand", "subscribedStatus", "youtubeProduct"]),
                ],
                data::LIVE_PLAYBACK_DETAIL_METRICS,
            ),
            GeographyBasedActivity => simple(
                vec![SetRule::required(&["country"]), SetRule::optional(CONTENT_TYPE)],
                vec![
                    SetRule::zero_or_one(CONTINENTAL),
                    SetRule::zero_or_one(VIDEO_OR_GROUP),
                ],
                data::ALL_VIDEO_METRICS,
            ),
            PlaybackDetailsViewPercentageGeographyBased => simple(
                vec![
                    SetRule::required(&["country"]),
                    SetRule::zero_or_more(&[
                        "creatorContentType",
                        "subscribedStatus",
                        "youtubeProduct",
                    ]),
                ],
                vec![
                    SetRule::zero_or_one(CONTINENTAL),
                    SetRule::zero_or_one(VIDEO_OR_GROUP),
                    SetRule::zero_or_more(&["subscribedStatus", "youtubeProduct"]),
                ],
                data::VIEW_PERCENTAGE_PLAYBACK_DETAIL_METRICS,
            ),
            PlaybackDetailsLiveGeographyBased => simple(
                vec![
                    SetRule::required(&["country"]),
                    SetRule::zero_or_more(&[
                        "creatorContentType",
                        "liveOrOnDemand",
                        "subscribedStatus",
                        "youtubeProduct",
                    ]),
                ],
                vec![
                    SetRule::zero_or_one(CONTINENTAL),
                    SetRule::zero_or_one(VIDEO_OR_GROUP),
                    SetRule::zero_or_more(&["liveOrOnDemand", "subscribedStatus", "youtubeProduct"]),
                ],
                data::LIVE_PLAYBACK_DETAIL_METRICS,
            ),
            GeographyBasedActivityUs => simple(
                vec![SetRule::required(&["province"]), SetRule::optional(CONTENT_TYPE)],
                vec![
                    SetRule::required(&["country==US"]),
                    SetRule::zero_or_one(VIDEO_OR_GROUP),
                ],
                data::ALL_PROVINCE_METRICS,
            ),
            PlaybackDetailsViewPercentageGeographyBasedUs => simple(
                vec![
                    SetRule::required(&["province"]),
                    SetRule::zero_or_more(&[
                        "creatorContentType",
                        "subscribedStatus",
                        "youtubeProduct",
                    ]),
                ],
                vec![
                    SetRule::required(&["country==US"]),
                    SetRule::zero_or_one(VIDEO_OR_GROUP),
                    SetRule::zero_or_more(&["subscribedStatus", "youtubeProduct"]),
                ],
                data::VIEW_PERCENTAGE_PLAYBACK_DETAIL_METRICS,
            ),
            PlaybackDetailsLiveGeographyBasedUs => simple(
                vec![
                    SetRule::required(&["province"]),
                    SetRule::zero_or_more(&[
                        "creatorContentType",
                        "liveOrOnDemand",
                        "subscribedStatus",
                        "youtubeProduct",
                    ]),
                ],
                vec![
                    SetRule::required(&["country==US"]),
                    SetRule::zero_or_one(VIDEO_OR_GROUP),
                    SetRule::zero_or_more(&["liveOrOnDemand", "subscribedStatus", "youtubeProduct"]),
                ],
                data::LIVE_PLAYBACK_DETAIL_METRICS,
            ),
            GeographyBasedActivityByCity => ReportType::new(
                self,
                vec![
                    SetRule::required(&["city"]),
                    SetRule::zero_or_more(&[
                        "creatorContentType",
                        "country",
                        "province",
                        "subscribedStatus",
                    ]),
                    SetRule::zero_or_one(DAY_OR_MONTH),
                ],
                vec![
                    SetRule::zero_or_one(ANY_REGION),
                    SetRule::zero_or_one(VIDEO_OR_GROUP),
                ],
                data::CITY_METRICS,
                SortOptions::descending_only(data::LOCATION_AND_TRAFFIC_SORT_OPTIONS),
            )
            .with_ceiling(CITY_RESULT_CEILING),
            PlaybackLocation => simple(
                vec![
                    SetRule::required(&["insightPlaybackLocationType"]),
                    SetRule::zero_or_more(&[
                        "creatorContentType",
                        "day",
                        "liveOrOnDemand",
                        "subscribedStatus",
                    ]),
                ],
                vec![
                    SetRule::zero_or_one(ANY_REGION),
                    SetRule::zero_or_one(VIDEO_OR_GROUP),
                    SetRule::zero_or_more(&["liveOrOnDemand", "subscribedStatus"]),
                ],
                data::LOCATION_AND_TRAFFIC_METRICS,
            ),
            PlaybackLocationDetail => ReportType::new(
                self,
                vec![
                    SetRule::required(&["insightPlaybackLocationDetail"]),
                    SetRule::optional(CONTENT_TYPE),
                ],
                vec![
                    SetRule::required(&["insightPlaybackLocationType==EMBEDDED"]),
                    SetRule::zero_or_one(ANY_REGION),
                    SetRule::zero_or_one(VIDEO_OR_GROUP),
                    SetRule::zero_or_more(&["liveOrOnDemand", "subscribedStatus"]),
                ],
                data::LOCATION_AND_TRAFFIC_METRICS,
                SortOptions::descending_only(data::LOCATION_AND_TRAFFIC_SORT_OPTIONS),
            )
            .with_ceiling(DETAIL_RESULT_CEILING),
            TrafficSource => simple(
                vec![
                    SetRule::required(&["insightTrafficSourceType"]),
                    SetRule::zero_or_more(&[
                        "creatorContentType",
                        "day",
                        "liveOrOnDemand",
                        "subscribedStatus",
                    ]),
                ],
                vec![
                    SetRule::zero_or_one(ANY_REGION),
                    SetRule::zero_or_one(VIDEO_OR_GROUP),
                    SetRule::zero_or_more(&["liveOrOnDemand", "subscribedStatus"]),
                ],
                data::LOCATION_AND_TRAFFIC_METRICS,
            ),
            TrafficSourceDetail => ReportType::new(
                self,
                vec![
                    SetRule::required(&["insightTrafficSourceDetail"]),
                    SetRule::optional(CONTENT_TYPE),
                ],
                vec![
                    SetRule::required(&["insightTrafficSourceType"]),
                    SetRule::zero_or_one(ANY_REGION),
                    SetRule::zero_or_one(VIDEO_OR_GROUP),
                    SetRule::zero_or_more(&["liveOrOnDemand", "subscribedStatus"]),
                ],
                data::LOCATION_AND_TRAFFIC_METRICS,
                SortOptions::descending_only(data::LOCATION_AND_TRAFFIC_SORT_OPTIONS),
            )
            .with_ceiling(DETAIL_RESULT_CEILING),
            DeviceType => simple(
                vec![
                    SetRule::required(&["deviceType"]),
                    SetRule::zero_or_more(&[
                        "creatorContentType",
                        "day",
                        "liveOrOnDemand",
                        "subscribedStatus",
                        "youtubeProduct",
                    ]),
                ],
                vec![
                    SetRule::zero_or_one(ANY_REGION),
                    SetRule::zero_or_one(VIDEO_OR_GROUP),
                    SetRule::zero_or_more(&[
                        "operatingSystem",
                        "liveOrOnDemand",
                        "subscribedStatus",
                        "youtubeProduct",
                    ]),
                ],
                data::LOCATION_AND_TRAFFIC_METRICS,
            ),
            OperatingSystem => simple(
                vec![
                    SetRule::required(&["operatingSystem"]),
                    SetRule::zero_or_more(&[
                        "creatorContentType",
                        "day",
                        "liveOrOnDemand",
                        "subscribedStatus",
                        "youtubeProduct",
                    ]),
                ],
                vec![
                    SetRule::zero_or_one(ANY_REGION),
                    SetRule::zero_or_one(VIDEO_OR_GROUP),
                    SetRule::zero_or_more(&[
                        "deviceType",
                        "liveOrOnDemand",
                        "subscribedStatus",
                        "youtubeProduct",
                    ]),
                ],
                data::LOCATION_AND_TRAFFIC_METRICS,
            ),
            DeviceTypeAndOperatingSystem => simple(
                vec![
                    SetRule::required(&["deviceType", "operatingSystem"]),
                    SetRule::zero_or_more(&[
                        "creatorContentType",
                        "day",
                        "liveOrOnDemand",
                        "subscribedStatus",
                        "youtubeProduct",
                    ]),
                ],
                vec![
                    SetRule::zero_or_one(ANY_REGION),
                    SetRule::zero_or_one(VIDEO_OR_GROUP),
                    SetRule::zero_or_more(&["liveOrOnDemand", "subscribedStatus", "youtubeProduct"]),
                ],
                data::LOCATION_AND_TRAFFIC_METRICS,
            ),
            ViewerDemographics => simple(
                vec![
                    SetRule::one_or_more(&["ageGroup", "gender"]),
                    SetRule::zero_or_more(&[
                        "creatorContentType",
                        "liveOrOnDemand",
                        "subscribedStatus",
                    ]),
                ],
                vec![
                    SetRule::zero_or_one(ANY_REGION),
                    SetRule::zero_or_one(VIDEO_OR_GROUP),
                    SetRule::zero_or_more(&["liveOrOnDemand", "subscribedStatus"]),
                ],
                data::VIEWER_DEMOGRAPHICS_METRICS,
            ),
            EngagementAndContentSharing => simple(
                vec![
                    SetRule::required(&["sharingService"]),
                    SetRule::zero_or_more(&["creatorContentType", "subscribedStatus"]),
                ],
                vec![
                    SetRule::zero_or_one(REGION),
                    SetRule::zero_or_one(VIDEO_OR_GROUP),
                    SetRule::optional(&["subscribedStatus"]),
                ],
                data::SHARING_METRICS,
            ),
            AudienceRetention => simple(
                vec![
                    SetRule::required(&["elapsedVideoTimeRatio"]),
                    SetRule::optional(CONTENT_TYPE),
                ],
                vec![
                    SetRule::required(&["video"]),
                    SetRule::zero_or_more(&["audienceType", "subscribedStatus", "youtubeProduct"]),
                ],
                data::AUDIENCE_RETENTION_METRICS,
            ),
            AdPerformance => simple(
                vec![SetRule::required(&["adType"]), SetRule::optional(&["day"])],
                vec![SetRule::zero_or_one(VIDEO_OR_GROUP), SetRule::zero_or_one(REGION)],
                data::AD_PERFORMANCE_METRICS,
            ),
            TopVideosUs => top_videos(
                self,
                vec![
                    SetRule::required(&["province"]),
                    SetRule::optional(&["subscribedStatus"]),
                ],
                data::ALL_PROVINCE_METRICS,
                data::TOP_VIDEOS_SORT_OPTIONS,
            ),
            TopVideosRegional => top_videos(
                self,
                vec![SetRule::zero_or_one(REGION)],
                data::ALL_VIDEO_METRICS,
                data::TOP_VIDEOS_EXTRA_SORT_OPTIONS,
            ),
            TopVideosSubscribed => top_videos(
                self,
                vec![
                    SetRule::optional(&["subscribedStatus"]),
                    SetRule::zero_or_one(REGION),
                ],
                data::SUBSCRIPTION_METRICS,
                data::TOP_VIDEOS_SORT_OPTIONS,
            ),
            TopVideosYouTubeProduct => top_videos(
                self,
                vec![
                    SetRule::zero_or_one(ANY_REGION),
                    SetRule::zero_or_more(&["subscribedStatus", "youtubeProduct"]),
                ],
                data::VIEW_PERCENTAGE_PLAYBACK_DETAIL_METRICS,
                data::TOP_VIDEOS_SORT_OPTIONS,
            ),
            TopVideosPlaybackDetail => top_videos(
                self,
                vec![
                    SetRule::zero_or_one(ANY_REGION),
                    SetRule::zero_or_more(&["liveOrOnDemand", "subscribedStatus", "youtubeProduct"]),
                ],
                data::VIEW_PERCENTAGE_PLAYBACK_DETAIL_METRICS,
                data::TOP_VIDEOS_SORT_OPTIONS,
            ),
            BasicUserActivityPlaylist => simple(
                vec![],
                vec![
                    SetRule::required(CURATED),
                    SetRule::zero_or_one(ANY_REGION),
                    SetRule::zero_or_one(PLAYLIST_OR_GROUP),
                    SetRule::zero_or_more(&["subscribedStatus", "youtubeProduct"]),
                ],
                data::ALL_PLAYLIST_METRICS,
            ),
            TimeBasedActivityPlaylist => simple(
                vec![
                    SetRule::exactly_one(DAY_OR_MONTH),
                    SetRule::zero_or_more(&["subscribedStatus", "youtubeProduct"]),
                ],
                vec![
                    SetRule::required(CURATED),
                    SetRule::zero_or_one(ANY_REGION),
                    SetRule::zero_or_one(PLAYLIST_OR_GROUP),
                    SetRule::zero_or_more(&["subscribedStatus", "youtubeProduct"]),
                ],
                data::ALL_PLAYLIST_METRICS,
            ),
            GeographyBasedActivityPlaylist => simple(
                vec![
                    SetRule::required(&["country"]),
                    SetRule::zero_or_more(&["subscribedStatus", "youtubeProduct"]),
                ],
                vec![
                    SetRule::required(CURATED),
                    SetRule::zero_or_one(CONTINENTAL),
                    SetRule::zero_or_one(PLAYLIST_OR_GROUP),
                    SetRule::zero_or_more(&["subscribedStatus", "youtubeProduct"]),
                ],
                data::ALL_PLAYLIST_METRICS,
            ),
            GeographyBasedActivityUsPlaylist => simple(
                vec![
                    SetRule::required(&["province"]),
                    SetRule::zero_or_more(&["subscribedStatus", "youtubeProduct"]),
                ],
                vec![
                    SetRule::required(&["isCurated==1", "country==US"]),
                    SetRule::zero_or_one(PLAYLIST_OR_GROUP),
                    SetRule::zero_or_more(&["subscribedStatus", "youtubeProduct"]),
                ],
                data::ALL_PLAYLIST_METRICS,
            ),
            PlaybackLocationPlaylist => simple(
                vec![
                    SetRule::required(&["insightPlaybackLocationType"]),
                    SetRule::zero_or_more(&["day", "subscribedStatus"]),
                ],
                playlist_location_filters(CURATED),
                data::LOCATION_AND_TRAFFIC_PLAYLIST_METRICS,
            ),
            PlaybackLocationDetailPlaylist => ReportType::new(
                self,
                vec![SetRule::required(&["insightPlaybackLocationDetail"])],
                playlist_location_filters(&[
                    "isCurated==1",
                    "insightPlaybackLocationType==EMBEDDED",
                ]),
                data::LOCATION_AND_TRAFFIC_PLAYLIST_METRICS,
                SortOptions::descending_only(data::LOCATION_AND_TRAFFIC_PLAYLIST_SORT_OPTIONS),
            )
            .with_ceiling(DETAIL_RESULT_CEILING),
            TrafficSourcePlaylist => simple(
                vec![
                    SetRule::required(&["insightTrafficSourceType"]),
                    SetRule::zero_or_more(&["day", "subscribedStatus"]),
                ],
                playlist_location_filters(CURATED),
                data::LOCATION_AND_TRAFFIC_PLAYLIST_METRICS,
            ),
            TrafficSourceDetailPlaylist => ReportType::new(
                self,
                vec![SetRule::required(&["insightTrafficSourceDetail"])],
                playlist_location_filters(&["isCurated==1", "insightTrafficSourceType"]),
                data::LOCATION_AND_TRAFFIC_PLAYLIST_METRICS,
                SortOptions::descending_only(data::LOCATION_AND_TRAFFIC_PLAYLIST_SORT_OPTIONS),
            )
            .with_ceiling(DETAIL_RESULT_CEILING),
            DeviceTypePlaylist => simple(
                vec![
                    SetRule::required(&["deviceType"]),
                    SetRule::zero_or_more(&["day", "subscribedStatus", "youtubeProduct"]),
                ],
                vec![
                    SetRule::required(CURATED),
                    SetRule::zero_or_one(ANY_REGION),
                    SetRule::zero_or_one(PLAYLIST_OR_GROUP),
                    SetRule::zero_or_more(&["operatingSystem", "subscribedStatus", "youtubeProduct"]),
                ],
                data::LOCATION_AND_TRAFFIC_PLAYLIST_METRICS,
            ),
            OperatingSystemPlaylist => simple(
                vec![
                    SetRule::required(&["operatingSystem"]),
                    SetRule::zero_or_more(&["day", "subscribedStatus", "youtubeProduct"]),
                ],
                vec![
                    SetRule::required(CURATED),
                    SetRule::zero_or_one(ANY_REGION),
                    SetRule::zero_or_one(PLAYLIST_OR_GROUP),
                    SetRule::zero_or_more(&["deviceType", "subscribedStatus", "youtubeProduct"]),
                ],
                data::LOCATION_AND_TRAFFIC_PLAYLIST_METRICS,
            ),
            DeviceTypeAndOperatingSystemPlaylist => simple(
                vec![
                    SetRule::required(&["deviceType", "operatingSystem"]),
                    SetRule::zero_or_more(&["day", "subscribedStatus", "youtubeProduct"]),
                ],
                vec![
                    SetRule::required(CURATED),
                    SetRule::zero_or_one(ANY_REGION),
                    SetRule::zero_or_one(PLAYLIST_OR_GROUP),
                    SetRule::zero_or_more(&["subscribedStatus", "youtubeProduct"]),
                ],
                data::LOCATION_AND_TRAFFIC_PLAYLIST_METRICS,
            ),
            ViewerDemographicsPlaylist => simple(
                vec![
                    SetRule::one_or_more(&["ageGroup", "gender"]),
                    SetRule::optional(&["subscribedStatus"]),
                ],
                vec![
                    SetRule::required(CURATED),
                    SetRule::zero_or_one(ANY_REGION),
                    SetRule::zero_or_one(PLAYLIST_OR_GROUP),
                    SetRule::zero_or_more(&["subscribedStatus"]),
                ],
                data::VIEWER_DEMOGRAPHICS_METRICS,
            ),
            TopPlaylists => ReportType::new(
                self,
                vec![SetRule::required(&["playlist"])],
                vec![
                    SetRule::required(CURATED),
                    SetRule::zero_or_one(ANY_REGION),
                    SetRule::zero_or_more(&["playlist", "subscribedStatus", "youtubeProduct"]),
                ],
                data::ALL_PLAYLIST_METRICS,
                SortOptions::new(data::TOP_VIDEOS_SORT_OPTIONS),
            )
            .with_ceiling(TOP_RESULT_CEILING),
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn top_videos(
    kind: ReportKind,
    filters: Vec<SetRule>,
    metrics: &'static [&'static str],
    sort_options: &'static [&'static str],
) -> ReportType {
    ReportType::new(
        kind,
        vec![
            SetRule::required(&["video"]),
            SetRule::optional(&["creatorContentType"]),
        ],
        filters,
        metrics,
        SortOptions::descending_only(sort_options),
    )
    .with_ceiling(TOP_RESULT_CEILING)
}

fn playlist_location_filters(required: &'static [&'static str]) -> Vec<SetRule> {
    vec![
        SetRule::required(required),
        SetRule::zero_or_one(&["country", "province", "continent", "subContinent"]),
        SetRule::zero_or_one(&["playlist", "group"]),
        SetRule::optional(&["subscribedStatus"]),
    ]
}

/// The rule set for one report kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportType {
    kind: ReportKind,
    dimensions: Dimensions,
    filters: Filters,
    metrics: Metrics,
    sort_options: SortOptions,
    /// Result ceiling. Present only on detailed report types, which also
    /// demand sort options and an explicit `max_results`.
    max_results: Option<u32>,
}

impl ReportType {
    fn new(
        kind: ReportKind,
        dimensions: Vec<SetRule>,
        filters: Vec<SetRule>,
        metrics: &'static [&'static str],
        sort_options: SortOptions,
    ) -> Self {
        Self {
            kind,
            dimensions: Dimensions::new(dimensions),
            filters: Filters::new(filters),
            metrics: Metrics::new(metrics),
            sort_options,
            max_results: None,
        }
    }

    fn with_ceiling(mut self, max_results: u32) -> Self {
        self.max_results = Some(max_results);
        self
    }

    pub fn kind(&self) -> ReportKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn dimensions(&self) -> &Dimensions {
        &self.dimensions
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn sort_options(&self) -> &SortOptions {
        &self.sort_options
    }

    pub fn max_results(&self) -> Option<u32> {
        self.max_results
    }

    pub fn is_detailed(&self) -> bool {
        self.max_results.is_some()
    }

    /// Check a request against this report type. The first violation wins.
    pub fn validate(
        &self,
        dimensions: &[String],
        filters: &BTreeMap<String, String>,
        metrics: &[String],
        sort_options: &[String],
        max_results: i64,
        start_index: i64,
    ) -> Result<(), QueryError> {
        let has_dimension = |name: &str| dimensions.iter().any(|d| d == name);

        if self.kind == ReportKind::GeographyBasedActivityByCity
            && max_results > i64::from(CITY_RESULT_CEILING)
            && max_results <= 250
        {
            tracing::warn!(
                "While the documentation says city reports can have a maximum of 250 \
                 results, the actual maximum the API accepts (currently) is {}",
                CITY_RESULT_CEILING
            );
        }

        let filter_rules = if self.kind == ReportKind::GeographyBasedActivityByCity
            && has_dimension("province")
        {
            Cow::Owned(Filters::new(vec![
                SetRule::required(&["country==US"]),
                SetRule::zero_or_one(&["video", "group"]),
            ]))
        } else {
            Cow::Borrowed(&self.filters)
        };

        self.dimensions.validate(dimensions)?;
        filter_rules.validate(filters)?;
        self.metrics.validate(metrics)?;
        self.sort_options.validate(sort_options)?;

        if let Some(ceiling) = self.max_results {
            let ceiling = i64::from(ceiling);
            if max_results == 0 {
                return Err(QueryError::request("expected a maximum number of results"));
            }
            if max_results > ceiling {
                return Err(QueryError::request(format!(
                    "expected no more than {} results, got {}",
                    ceiling,
                    group_thousands(max_results)
                )));
            }
            if start_index.saturating_add(max_results) > ceiling + 1 {
                return Err(QueryError::request("the start index is too high"));
            }
            if sort_options.is_empty() {
                return Err(QueryError::request("expected at least 1 sort option, got 0"));
            }
        }

        match self.kind {
            ReportKind::AudienceRetention => {
                if filters.get("video").is_some_and(|v| v.contains(',')) {
                    return Err(QueryError::request(
                        "only one video ID can be provided when 'elapsedVideoTimeRatio' \
                         is a dimension",
                    ));
                }
            }
            ReportKind::TrafficSourceDetail | ReportKind::TrafficSourceDetailPlaylist => {
                if let Some(source) = filters.get("insightTrafficSourceType") {
                    if !data::has_traffic_source_detail(source) {
                        return Err(QueryError::request(format!(
                            "dimensions and filters are incompatible with value '{}' \
                             for filter 'insightTrafficSourceType'",
                            source
                        )));
                    }
                }
            }
            _ => {}
        }

        Ok(())
    }
}

fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
