use seed::{prelude::*, virtual_dom::AtValue, *};
use serde_wasm_bindgen::to_value;
use shared::{
    EntryOrder, LoadReport, MapSurface, MapView, NamedPath, PathCollection, PathCollectionBuilder,
    PathStyle, SelectionController, SelectionState, SelectorEntry, parse_document_list,
};
use wasm_bindgen::prelude::{JsValue, wasm_bindgen};

#[wasm_bindgen(module = "/leaflet_map.js")]
extern "C" {
    #[wasm_bindgen(js_name = initMap)]
    fn init_map(view: JsValue);
    #[wasm_bindgen(js_name = drawPath)]
    fn draw_path_js(coords: JsValue, style: JsValue, label: &str) -> u32;
    #[wasm_bindgen(js_name = setPathStyle)]
    fn set_path_style_js(handle: u32, style: JsValue);
    #[wasm_bindgen(js_name = fitPathBounds)]
    fn fit_path_bounds_js(handle: u32);
}

fn api_root() -> String {
    if let Some(url) = option_env!("FRONTEND_API_ROOT") {
        return url.trim_end_matches('/').to_string();
    }
    "http://localhost:8080".to_string()
}

fn document_list_url(root: &str) -> String {
    format!("{root}/api/kml")
}

fn document_url(root: &str, identifier: &str) -> String {
    format!("{root}/kml/{identifier}")
}

/// Leaflet polylines behind the JS bridge. Labels are remembered on the Rust
/// side so lookups don't cross into JavaScript.
#[derive(Default)]
pub struct LeafletSurface {
    layers: Vec<(u32, String)>,
}

impl MapSurface for LeafletSurface {
    type Handle = u32;

    fn draw_path(&mut self, path: &NamedPath, style: &PathStyle) -> u32 {
        let coords = to_value(path.path()).unwrap_or(JsValue::NULL);
        let handle = draw_path_js(coords, style_value(style), path.name());
        self.layers.push((handle, path.name().to_string()));
        handle
    }

    fn set_style(&mut self, handle: u32, style: &PathStyle) {
        set_path_style_js(handle, style_value(style));
    }

    fn fit_viewport_to(&mut self, handle: u32) {
        fit_path_bounds_js(handle);
    }

    fn label(&self, handle: u32) -> Option<String> {
        self.layers
            .iter()
            .find(|(h, _)| *h == handle)
            .map(|(_, label)| label.clone())
    }

    fn rendered(&self) -> Vec<u32> {
        self.layers.iter().map(|(handle, _)| *handle).collect()
    }
}

fn style_value(style: &PathStyle) -> JsValue {
    to_value(style).unwrap_or(JsValue::NULL)
}

type Controller = SelectionController<LeafletSurface, Vec<SelectorEntry>>;

pub struct Model {
    controller: Option<Controller>,
    selected: String,
    report: Option<LoadReport>,
}

pub enum Msg {
    PathsLoaded(PathCollection, LoadReport),
    SelectionChanged(String),
}

pub fn init(_: Url, orders: &mut impl Orders<Msg>) -> Model {
    orders.perform_cmd(load_paths(api_root()));
    Model {
        controller: None,
        selected: String::new(),
        report: None,
    }
}

pub fn update(msg: Msg, model: &mut Model, _: &mut impl Orders<Msg>) {
    match msg {
        Msg::PathsLoaded(collection, report) => {
            if collection.is_empty() {
                web_sys::console::error_1(&"No KML files found or processed.".into());
            }
            model.controller = Some(SelectionController::new(
                collection,
                LeafletSurface::default(),
                Vec::new(),
                EntryOrder::default(),
            ));
            model.report = Some(report);
        }
        Msg::SelectionChanged(value) => {
            if let Some(controller) = model.controller.as_mut() {
                let state = controller.apply_selection(&value);
                web_sys::console::debug_1(&format!("[frontend] selection {state:?}").into());
            }
            model.selected = value;
        }
    }
}

/// Lists the documents, then fetches them one by one. A failing document is
/// logged and skipped.
async fn load_paths(root: String) -> Msg {
    let identifiers = match fetch_text(&document_list_url(&root)).await {
        Ok(json) => parse_document_list(&json),
        Err(err) => {
            web_sys::console::error_1(&format!("Error fetching KML list: {err}").into());
            Vec::new()
        }
    };

    let mut builder = PathCollectionBuilder::new();
    for identifier in &identifiers {
        let fetched = fetch_text(&document_url(&root, identifier)).await;
        if let Err(err) = &fetched {
            web_sys::console::error_1(&format!("Failed to fetch {identifier}: {err}").into());
        }
        builder.push_document(identifier, fetched);
    }

    let (collection, report) = builder.finish();
    web_sys::console::debug_1(
        &format!(
            "[frontend] loaded {} path(s), skipped {}",
            collection.len(),
            report.documents() - report.loaded
        )
        .into(),
    );
    Msg::PathsLoaded(collection, report)
}

async fn fetch_text(url: &str) -> Result<String, String> {
    let raw = Request::new(url)
        .fetch()
        .await
        .map_err(|err| format!("{err:?}"))?;
    let response = raw.check_status().map_err(|err| format!("{err:?}"))?;
    response.text().await.map_err(|err| format!("{err:?}"))
}

pub fn view(model: &Model) -> Node<Msg> {
    let Some(controller) = &model.controller else {
        return div![
            C!["flight-picker"],
            select![
                id!["polyline-selector"],
                attrs! { At::Disabled => bool_attr(true) },
                option!["Loading flights…"],
            ],
        ];
    };

    let options = controller.selector().iter().map(|entry| {
        option![
            attrs! {
                At::Value => entry.value.as_str(),
                At::Selected => bool_attr(entry.value == model.selected),
            },
            entry.label.as_str(),
        ]
    });

    div![
        C!["flight-picker"],
        select![
            id!["polyline-selector"],
            options,
            input_ev(Ev::Change, Msg::SelectionChanged),
        ],
        model
            .report
            .as_ref()
            .map(|report| div![C!["status"], status_text(report, controller.current_state())])
            .unwrap_or_else(|| empty![]),
    ]
}

fn status_text(report: &LoadReport, state: &SelectionState) -> String {
    let skipped = report.documents() - report.loaded;
    let selection = match state {
        SelectionState::None | SelectionState::All => "all flights shown".to_string(),
        SelectionState::Named(name) => format!("showing {name}"),
    };
    if skipped == 0 {
        format!("{} flight(s), {selection}", report.loaded)
    } else {
        format!("{} flight(s), {skipped} skipped, {selection}", report.loaded)
    }
}

fn bool_attr(value: bool) -> AtValue {
    if value {
        AtValue::Some("true".into())
    } else {
        AtValue::Ignored
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    if let Ok(map_view) = to_value(&MapView::default()) {
        init_map(map_view);
    }
    App::start("app", init, update, view);
}
