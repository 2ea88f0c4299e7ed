//! Report catalogue - named, parameterised queries over the BI schema
//!
//! Reports run through the query executor like any client statement, so
//! they are validated too.

use gateway_common::ReportInfo;

/// A predefined report query
#[derive(Debug, Clone, Copy)]
pub struct Report {
    pub name: &'static str,
    pub description: &'static str,
    /// Names of the positional `?` parameters, in order
    pub params: &'static [&'static str],
    pub sql: &'static str,
}

impl Report {
    pub fn info(&self) -> ReportInfo {
        ReportInfo {
            name: self.name.to_string(),
            description: self.description.to_string(),
            params: self.params.iter().map(|p| p.to_string()).collect(),
        }
    }
}

pub const REPORTS: &[Report] = &[
    Report {
        name: "orders_by_customer",
        description: "Orders of one customer, newest first",
        params: &["customer_id"],
        sql: "SELECT o.order_id, o.order_code, c.customer_name, o.order_date, \
              o.total_amount, o.actual_amount, o.payment_status, o.delivery_status \
              FROM sales_order o \
              JOIN customer c ON o.customer_id = c.customer_id \
              WHERE o.customer_id = ? \
              ORDER BY o.order_date DESC",
    },
    Report {
        name: "department_employees",
        description: "Employees of one department",
        params: &["dept_id"],
        sql: "SELECT e.emp_id, e.emp_code, e.emp_name, e.position, e.mobile, e.email, e.entry_date \
              FROM employee e \
              WHERE e.dept_id = ? \
              ORDER BY e.emp_code",
    },
    Report {
        name: "product_sales",
        description: "Sales totals per product within a date range",
        params: &["start_date", "end_date"],
        sql: "SELECT p.product_code, p.product_name, \
              COUNT(DISTINCT o.order_id) AS order_count, \
              SUM(d.quantity) AS total_quantity, \
              SUM(d.amount) AS total_amount, \
              SUM(d.gross_profit) AS total_profit \
              FROM sales_order_detail d \
              JOIN product p ON d.product_id = p.product_id \
              JOIN sales_order o ON d.order_id = o.order_id \
              WHERE o.order_date BETWEEN ? AND ? \
              GROUP BY p.product_id, p.product_code, p.product_name \
              ORDER BY total_amount DESC",
    },
    Report {
        name: "payment_status",
        description: "Payment records of one order",
        params: &["order_id"],
        sql: "SELECT p.payment_id, p.payment_code, p.payment_date, p.payment_amount, \
              p.payment_method, p.payment_status \
              FROM payment_record p \
              WHERE p.order_id = ? \
              ORDER BY p.payment_date",
    },
    Report {
        name: "department_performance",
        description: "Sales and profit per department within a date range",
        params: &["start_date", "end_date"],
        sql: "SELECT d.dept_name, \
              COUNT(DISTINCT o.order_id) AS order_count, \
              SUM(o.actual_amount) AS total_sales, \
              SUM(od.gross_profit) AS total_profit \
              FROM department d \
              JOIN employee e ON d.dept_id = e.dept_id \
              JOIN sales_order o ON e.emp_id = o.emp_id \
              JOIN sales_order_detail od ON o.order_id = od.order_id \
              WHERE o.order_date BETWEEN ? AND ? \
              GROUP BY d.dept_id, d.dept_name \
              ORDER BY total_sales DESC",
    },
];

/// Look up a report by name
pub fn find(name: &str) -> Option<&'static Report> {
    REPORTS.iter().find(|r| r.name == name)
}
