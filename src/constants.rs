//! Shared constants: the canonical null marker, placeholder tokens and the
//! static reference tables the cleaners consult.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// What the downstream bulk loader expects in place of a missing value
pub const NULL_MARKER: &str = "Null";

/// Replacement for embedded carriage returns and newlines
pub const LINE_BREAK_PLACEHOLDER: &str = "__";

/// Camera heading (degrees) used when synthesizing a street view URL
pub const DEFAULT_STREETVIEW_HEADING: u16 = 180;

/// Defaults written to the project table when the source leaves them empty
pub const DEFAULT_CITY: &str = "Washington";
pub const DEFAULT_STATE: &str = "DC";

/// Census tracts (state + county + tract GEOID) inside the District
pub const DC_TRACTS: &[&str] = &[
    "11001000100", "11001000201", "11001000202", "11001000300", "11001000400", "11001000501",
    "11001000502", "11001000600", "11001000701", "11001000702", "11001000801", "11001000802",
    "11001000901", "11001000902", "11001001001", "11001001002", "11001001100", "11001001200",
    "11001001301", "11001001302", "11001001401", "11001001402", "11001001500", "11001001600",
    "11001001702", "11001001803", "11001001804", "11001001901", "11001001902", "11001002001",
    "11001002002", "11001002101", "11001002102", "11001002201", "11001002202", "11001002301",
    "11001002302", "11001002400", "11001002501", "11001002502", "11001002600", "11001002701",
    "11001002702", "11001002801", "11001002802", "11001002900", "11001003000", "11001003100",
    "11001003200", "11001003301", "11001003302", "11001003400", "11001003500", "11001003600",
    "11001003700", "11001003800", "11001003900", "11001004001", "11001004002", "11001004100",
    "11001004201", "11001004202", "11001004300", "11001004400", "11001004600", "11001004701",
    "11001004702", "11001004801", "11001004802", "11001004901", "11001004902", "11001005001",
    "11001005002", "11001005201", "11001005301", "11001005500", "11001005600", "11001005800",
    "11001005900", "11001006202", "11001006400", "11001006500", "11001006600", "11001006700",
    "11001006801", "11001006802", "11001006804", "11001006900", "11001007000", "11001007100",
    "11001007200", "11001007301", "11001007304", "11001007401", "11001007403", "11001007404",
    "11001007406", "11001007407", "11001007408", "11001007409", "11001007502", "11001007503",
    "11001007504", "11001007601", "11001007603", "11001007604", "11001007605", "11001007703",
    "11001007707", "11001007708", "11001007709", "11001007803", "11001007804", "11001007806",
    "11001007807", "11001007808", "11001007809", "11001007901", "11001007903", "11001008001",
    "11001008002", "11001008100", "11001008200", "11001008301", "11001008302", "11001008402",
    "11001008410", "11001008701", "11001008702", "11001008802", "11001008803", "11001008804",
    "11001008903", "11001008904", "11001009000", "11001009102", "11001009201", "11001009203",
    "11001009204", "11001009301", "11001009302", "11001009400", "11001009501", "11001009503",
    "11001009504", "11001009505", "11001009507", "11001009508", "11001009509", "11001009601",
    "11001009602", "11001009603", "11001009604", "11001009700", "11001009801", "11001009802",
    "11001009803", "11001009804", "11001009807", "11001009810", "11001009811", "11001009901",
    "11001009902", "11001009903", "11001009904", "11001009905", "11001009906", "11001009907",
    "11001010100", "11001010200", "11001010300", "11001010400", "11001010500", "11001010600",
    "11001010700", "11001010800", "11001010900", "11001011000", "11001011100",];

/// Neighborhood cluster label to its published description
pub static CLUSTER_DESC_MAP: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Cluster 1", "Kalorama Heights, Adams Morgan, Lanier Heights"),
        ("Cluster 2", "Columbia Heights, Mt. Pleasant, Pleasant Plains, Park View"),
        ("Cluster 3", "Howard University, Le Droit Park, Cardozo/Shaw"),
        ("Cluster 4", "Georgetown, Burleith/Hillandale"),
        ("Cluster 5", "West End, Foggy Bottom, GWU"),
        ("Cluster 6", "Dupont Circle, Connecticut Avenue/K Street"),
        ("Cluster 7", "Shaw, Logan Circle"),
        ("Cluster 8", "Downtown, Chinatown, Penn Quarters, Mount Vernon Square, North Capitol Street"),
        ("Cluster 9", "Southwest Employment Area, Southwest/Waterfront, Fort McNair, Buzzard Point"),
        ("Cluster 10", "Hawthorne, Barnaby Woods, Chevy Chase"),
        ("Cluster 11", "Friendship Heights, American University Park, Tenleytown"),
        ("Cluster 12", "North Cleveland Park, Forest Hills, Van Ness"),
        ("Cluster 13", "Spring Valley, Palisades, Wesley Heights, Foxhall Crescent, Foxhall Village, Georgetown Reservoir"),
        ("Cluster 14", "Cathedral Heights, McLean Gardens, Glover Park"),
        ("Cluster 15", "Cleveland Park, Woodley Park, Massachusetts Avenue Heights, Woodland-Normanstone Terrace"),
        ("Cluster 16", "Colonial Village, Shepherd Park, North Portal Estates"),
        ("Cluster 17", "Takoma, Brightwood, Manor Park"),
        ("Cluster 18", "Brightwood Park, Crestwood, Petworth"),
        ("Cluster 19", "Lamont Riggs, Queens Chapel, Fort Totten, Pleasant Hill"),
        ("Cluster 20", "North Michigan Park, Michigan Park, University Heights"),
        ("Cluster 21", "Edgewood, Bloomingdale, Truxton Circle, Eckington"),
        ("Cluster 22", "Brookland, Brentwood, Langdon"),
        ("Cluster 23", "Ivy City, Arboretum, Trinidad, Carver Langston"),
        ("Cluster 24", "Woodridge, Fort Lincoln, Gateway"),
        ("Cluster 25", "Union Station, Stanton Park, Kingman Park"),
        ("Cluster 26", "Capitol Hill, Lincoln Park"),
        ("Cluster 27", "Near Southeast, Navy Yard"),
        ("Cluster 28", "Historic Anacostia"),
        ("Cluster 29", "Eastland Gardens, Kenilworth"),
        ("Cluster 30", "Mayfair, Hillbrook, Mahaning Heights"),
        ("Cluster 31", "Deanwood, Burrville, Grant Park, Lincoln Heights, Fairmont Heights"),
        ("Cluster 32", "River Terrace, Benning, Greenway, Dupont Park"),
        ("Cluster 33", "Capitol View, Marshall Heights, Benning Heights"),
        ("Cluster 34", "Twining, Fairlawn, Randle Highlands, Penn Branch, Fort Davis Park, Fort Dupont"),
        ("Cluster 35", "Fairfax Village, Naylor Gardens, Hillcrest, Summit Park"),
        ("Cluster 36", "Woodland/Fort Stanton, Garfield Heights, Knox Hill"),
        ("Cluster 37", "Sheridan, Barry Farm, Buena Vista"),
        ("Cluster 38", "Douglas, Shipley Terrace"),
        ("Cluster 39", "Congress Heights, Bellevue, Washington Highlands"),
        ("Cluster 40", "Walter Reed"),
        ("Cluster 41", "Rock Creek Park"),
        ("Cluster 42", "Observatory Circle"),
        ("Cluster 43", "Saint Elizabeths"),
        ("Cluster 44", "Joint Base Anacostia-Bolling"),
        ("Cluster 45", "National Mall, Potomac River"),
        ("Cluster 46", "Arboretum, Anacostia River"),
    ])
});
