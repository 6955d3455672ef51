//! The built-in route table of the house application.
//!
//! # Layout
//!
//! | Prefix | Audience | Resource check |
//! |--------|----------|----------------|
//! | `/`, `/houses`, `/login`, `/signup`, `/apply/:houseId` | everyone | none |
//! | `/dashboard`, `/profile` | any signed-in principal | none |
//! | `/house/:houseId/...` | residents | house membership |
//! | `/maintenance/:requestId` | submitter | maintenance request |
//! | `/admin/:houseId/...` | house admins | admin assignment |
//! | `/super-admin/*`, `/admin/expansion` | platform admins | none |
//!
//! Order matters: specific admin pages precede the `/admin/:houseId/*`
//! catch-all. `/admin/expansion` is declared after `/admin/:houseId` on
//! purpose and wins through its exact pattern.

use roost_auth::{Permission, ResourceType, RouteRule};

const DASHBOARD: &str = "/dashboard";

/// The house application's rules, in matching order.
#[must_use]
pub fn house_routes() -> Vec<RouteRule> {
    use Permission as P;
    use ResourceType::{House, Maintenance};

    let resident = |pattern: &str, permission: Permission| {
        RouteRule::protected(pattern)
            .requires(permission)
            .scoped_to(House)
            .fallback(DASHBOARD)
    };
    let admin = resident;

    vec![
        // Public
        RouteRule::public("/"),
        RouteRule::public("/houses"),
        RouteRule::public("/houses/:houseId"),
        RouteRule::public("/login"),
        RouteRule::public("/signup"),
        RouteRule::public("/apply/:houseId"),
        // Any signed-in principal
        RouteRule::protected("/dashboard"),
        RouteRule::protected("/profile"),
        // Residents
        resident("/house/:houseId", P::ViewHouse),
        resident("/house/:houseId/residents", P::ViewResidents),
        resident("/house/:houseId/events", P::ViewEvents),
        resident("/house/:houseId/events/:eventId", P::ViewEvents),
        resident("/house/:houseId/maintenance", P::SubmitMaintenance),
        RouteRule::protected("/maintenance/:requestId")
            .requires(P::SubmitMaintenance)
            .scoped_to(Maintenance)
            .fallback(DASHBOARD),
        // House admins
        admin("/admin/:houseId", P::ManageHouse),
        admin("/admin/:houseId/residents", P::ManageResidents),
        admin("/admin/:houseId/events", P::ManageEvents),
        admin("/admin/:houseId/events/:eventId", P::ManageEvents),
        admin("/admin/:houseId/applications", P::ManageApplications),
        admin("/admin/:houseId/maintenance", P::ManageMaintenance),
        admin("/admin/:houseId/finance", P::ManageFinance),
        admin("/admin/:houseId/analytics", P::ViewAnalytics),
        admin("/admin/:houseId/*", P::ManageHouse),
        // Platform admins
        RouteRule::protected("/admin/expansion")
            .requires(P::ManageAllHouses)
            .fallback(DASHBOARD),
        RouteRule::protected("/super-admin/admins")
            .requires(P::ManageAdmins)
            .fallback(DASHBOARD),
        RouteRule::protected("/super-admin/analytics")
            .requires(P::ViewPlatformAnalytics)
            .fallback(DASHBOARD),
        RouteRule::protected("/super-admin/*")
            .requires(P::ManageAllHouses)
            .fallback(DASHBOARD),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use roost_auth::{Resource, RouteTable};
    use roost_types::TryNew;

    fn table() -> RouteTable {
        RouteTable::try_new(house_routes()).expect("built-in table must validate")
    }

    fn permission_of(path: &str) -> Option<Permission> {
        table()
            .match_path(path)
            .and_then(|m| m.rule().required_permission)
    }

    #[test]
    fn public_pages() {
        let t = table();
        for path in ["/", "/houses", "/houses/H1", "/login", "/signup", "/apply/H1"] {
            assert!(t.match_path(path).unwrap().is_public(), "{path}");
        }
    }

    #[test]
    fn signed_in_pages_need_no_permission() {
        let t = table();
        for path in ["/dashboard", "/profile"] {
            let m = t.match_path(path).unwrap();
            assert!(!m.is_public());
            assert!(m.rule().required_permission.is_none());
        }
    }

    #[test]
    fn expansion_wins_over_house_admin() {
        assert_eq!(permission_of("/admin/expansion"), Some(Permission::ManageAllHouses));
        assert_eq!(permission_of("/admin/H1"), Some(Permission::ManageHouse));
    }

    #[test]
    fn specific_admin_pages_precede_catch_all() {
        assert_eq!(
            permission_of("/admin/H1/residents"),
            Some(Permission::ManageResidents)
        );
        assert_eq!(permission_of("/admin/H1/finance"), Some(Permission::ManageFinance));
        assert_eq!(permission_of("/admin/H1/settings/rooms"), Some(Permission::ManageHouse));
    }

    #[test]
    fn super_admin_section() {
        assert_eq!(permission_of("/super-admin/admins"), Some(Permission::ManageAdmins));
        assert_eq!(permission_of("/super-admin"), Some(Permission::ManageAllHouses));
        assert_eq!(
            permission_of("/super-admin/houses/H1/archive"),
            Some(Permission::ManageAllHouses)
        );
    }

    #[test]
    fn house_pages_check_the_house() {
        let t = table();
        let m = t.match_path("/house/H1/events/E4").unwrap();
        assert_eq!(
            m.resource().unwrap(),
            Some(Resource::new(ResourceType::House, "H1").unwrap())
        );
        assert_eq!(m.redirect_target("/elsewhere"), "/dashboard");

        let m = t.match_path("/maintenance/M-9").unwrap();
        assert_eq!(
            m.resource().unwrap(),
            Some(Resource::new(ResourceType::Maintenance, "M-9").unwrap())
        );
    }

    #[test]
    fn permission_rules_carry_a_fallback() {
        for rule in house_routes() {
            if rule.required_permission.is_some() {
                assert!(rule.fallback_path.is_some(), "{}", rule.path_pattern);
            }
        }
    }

    #[test]
    fn unknown_paths_are_unmatched() {
        assert!(table().match_path("/totally/unknown/path").is_none());
    }
}
