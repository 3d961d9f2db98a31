//! End-to-end placement flow over a file-backed store.

use std::sync::Arc;
use std::time::Duration;

use panel::display::{self, DisplayConfig, ServiceViewSource};
use panel::layout::{ConflictReport, create_positional_grid, organize_by_position};
use panel::model::{
    CreateDepartment, CreatePanel, CreateProduct, LayoutType, PanelProduct, Product,
    ProductPanelAssociation,
};
use panel::service::PanelService;
use tvpanel_kv::RedbStore;

fn open(path: &std::path::Path) -> PanelService {
    PanelService::new(Arc::new(RedbStore::open(path).unwrap()))
}

fn new_product(svc: &PanelService, name: &str) -> Product {
    svc.create_product(CreateProduct {
        code: name.to_uppercase(),
        name: name.into(),
        department: Some("Bovinos".into()),
        price: 10.0,
        position: None,
        active: true,
        unit: Some("kg".into()),
    })
    .unwrap()
}

fn setup(svc: &PanelService) -> (String, String) {
    let dep = svc
        .create_department(CreateDepartment {
            name: "Açougue".into(),
            code: "ACG".into(),
            description: None,
            color: Some("#b91c1c".into()),
            keywords: Vec::new(),
        })
        .unwrap();
    let tv = svc
        .create_panel(CreatePanel {
            name: "TV 1".into(),
            department_id: dep.id.clone(),
            layout_type: LayoutType::Layout1,
            title: None,
            subtitle: Some("Cortes frescos".into()),
            footer_text: None,
            polling_interval: 5,
            is_default: true,
            display_order: 0,
        })
        .unwrap();
    (dep.id, tv.id)
}

#[test]
fn two_products_on_one_slot() {
    let product = |id: &str| Product {
        id: id.into(),
        code: id.to_uppercase(),
        name: id.into(),
        department: None,
        price: 1.0,
        position: None,
        active: true,
        unit: None,
        create_at: None,
        update_at: None,
    };
    let products = vec![product("a"), product("b"), product("c")];
    let placements = vec![
        ProductPanelAssociation::new("1", "a", "tv", Some(3)),
        ProductPanelAssociation::new("2", "b", "tv", Some(3)),
        ProductPanelAssociation::new("3", "c", "tv", None),
    ];

    let report = ConflictReport::detect(&products, &placements);
    assert_eq!(report.conflicts.len(), 1);
    let ids: Vec<&str> = report.conflicts[0].products.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);

    let on_screen: Vec<PanelProduct> = placements
        .iter()
        .map(|a| {
            let p = products.iter().find(|p| p.id == a.product_id).unwrap();
            PanelProduct::from_association(p, a)
        })
        .collect();
    let grid = create_positional_grid(&organize_by_position(&on_screen));
    assert_eq!(grid.get(0).map(|p| p.id.as_str()), Some("c"));
    assert_eq!(grid.get(2).map(|p| p.id.as_str()), Some("a"));
    assert_eq!(grid.occupied().count(), 2);
}

#[test]
fn layout_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("panels.redb");

    let (tv, picanha) = {
        let svc = open(&path);
        let (_, tv) = setup(&svc);
        let picanha = new_product(&svc, "Picanha");
        let cupim = new_product(&svc, "Cupim");
        svc.add_products_to_panel(&tv, &[picanha.id.clone(), cupim.id.clone()])
            .unwrap();
        for p in [&picanha, &cupim] {
            svc.update_association(&tv, &p.id, serde_json::json!({"position": 4}))
                .unwrap();
        }
        assert!(svc.panel_conflicts(&tv).unwrap().has_conflicts());
        (tv, picanha)
    };

    let svc = open(&path);
    let report = svc.panel_conflicts(&tv).unwrap();
    assert_eq!(report.conflicts.len(), 1);
    assert_eq!(report.for_product(&picanha.id).len(), 1);

    // Resolve by moving one product to the suggested slot.
    let suggestions = svc.suggest_positions(&tv, 5).unwrap();
    assert_eq!(suggestions.next, 5);
    assert_eq!(suggestions.available, vec![1, 2, 3, 5, 6]);
    let next = suggestions.next;
    svc.update_association(&tv, &picanha.id, serde_json::json!({ "position": next }))
        .unwrap();
    assert!(!svc.panel_conflicts(&tv).unwrap().has_conflicts());
    assert_eq!(svc.panel_grid(&tv).unwrap().occupied().count(), 2);
}

#[tokio::test(start_paused = true)]
async fn display_follows_edits() {
    let dir = tempfile::tempdir().unwrap();
    let svc = Arc::new(open(&dir.path().join("panels.redb")));
    let (dep, tv) = setup(&svc);
    let picanha = new_product(&svc, "Picanha");
    svc.add_products_to_panel(&tv, &[picanha.id.clone()]).unwrap();

    let source = Arc::new(ServiceViewSource::new(svc.clone(), dep, tv.clone()));
    let handle = display::start(source, DisplayConfig::default());

    tokio::time::sleep(Duration::from_millis(1)).await;
    let frame = handle.current().frame.unwrap();
    assert_eq!(frame.view.config.title, "AÇOUGUE");
    assert_eq!(frame.grid.get(0).map(|p| p.id.as_str()), Some(picanha.id.as_str()));

    svc.update_association(&tv, &picanha.id, serde_json::json!({"position": 12}))
        .unwrap();
    tokio::time::sleep(Duration::from_secs(5)).await;

    let frame = handle.current().frame.unwrap();
    assert!(frame.grid.get(0).is_none());
    assert_eq!(frame.grid.get(11).map(|p| p.id.as_str()), Some(picanha.id.as_str()));
    assert_eq!(handle.current().fetches, 2);
}
