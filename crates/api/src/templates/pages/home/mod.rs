use maud::{html, Markup};

use crate::templates::layouts::{base, PageConfig};

/// Route index shown at `/`.
pub fn home_page(api_base: &str) -> Markup {
    let config = PageConfig {
        title: "Climate Observations API",
        api_base,
    };

    base(&config, content(api_base))
}

struct RouteInfo {
    description: &'static str,
    path: &'static str,
    example: Option<&'static str>,
}

const ROUTES: &[RouteInfo] = &[
    RouteInfo {
        description: "Dates and precipitation for the latest year of data",
        path: "/api/v1.0/precipitation",
        example: None,
    },
    RouteInfo {
        description: "List of stations",
        path: "/api/v1.0/stations",
        example: None,
    },
    RouteInfo {
        description: "Dates and temperature observations of the most active station for the latest year of data",
        path: "/api/v1.0/tobs",
        example: None,
    },
    RouteInfo {
        description: "Temperature normals from the given date",
        path: "/api/v1.0/yyyy-mm-dd",
        example: Some("/api/v1.0/2017-01-01"),
    },
    RouteInfo {
        description: "Temperature normals for the given date range",
        path: "/api/v1.0/yyyy-mm-dd/yyyy-mm-dd",
        example: Some("/api/v1.0/2017-01-01/2017-01-31"),
    },
];

fn content(api_base: &str) -> Markup {
    html! {
        h2 class="subtitle" { "Available Routes:" }
        table class="table is-fullwidth is-striped" {
            thead {
                tr {
                    th { "Description" }
                    th { "Route" }
                }
            }
            tbody {
                @for route in ROUTES {
                    tr {
                        td { (route.description) }
                        td {
                            @let href = route.example.unwrap_or(route.path);
                            a href={ (api_base) (href) } {
                                b { (route.path) }
                            }
                        }
                    }
                }
            }
        }
        p class="is-size-7" {
            "Dates must be formatted as YYYY-MM-DD; date ranges are inclusive."
        }
    }
}
