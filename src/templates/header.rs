//! The two header shapes.
//!
//! Invoices and estimates share [`CompanyHeader`]: company block with an
//! optional logo, customer address, and an identity panel on the right.
//! Job sheets use [`JobSheetHeader`]: a centred title, the customer, the
//! job reference panel and two status checkboxes.
//!
//! Both only read their record and draw the same commands every time, so
//! the header on a continuation page matches page one exactly.

use std::sync::Arc;

use crate::image_loader::LoadedImage;
use crate::layout::{Canvas, HeaderRenderer};
use crate::model::{Company, Customer, JobSheetIdentity};
use crate::style::{Color, TextStyle};

const LOGO_WIDTH: f64 = 120.0;
const CHECKBOX_SIZE: f64 = 10.0;
/// Space kept between a long customer block and the first content block.
const CUSTOMER_GAP: f64 = 20.0;

/// Header for invoices and estimates.
pub struct CompanyHeader<'a> {
    company: &'a Company,
    customer: &'a Customer,
    title: &'static str,
    number: String,
    details: Vec<(&'static str, String)>,
    logo: Option<Arc<LoadedImage>>,
}

impl<'a> CompanyHeader<'a> {
    pub fn new(
        company: &'a Company,
        customer: &'a Customer,
        title: &'static str,
        number: String,
        details: Vec<(&'static str, String)>,
        logo: Option<Arc<LoadedImage>>,
    ) -> Self {
        Self {
            company,
            customer,
            title,
            number,
            details,
            logo,
        }
    }

    /// Company name, address lines and logo. Returns the top baseline.
    fn draw_company(&self, canvas: &mut Canvas) -> f64 {
        let g = *canvas.geometry();
        let top = g.height() - 25.0;
        canvas.draw_string(g.left(), top, &self.company.name, TextStyle::bold(18.0));

        let small = TextStyle::regular(8.0);
        let vat = format!("VAT {}", self.company.vat);
        let lines = [
            (16.0, self.company.address_line1.as_str()),
            (11.0, self.company.phone.as_str()),
            (11.0, self.company.website.as_str()),
            (11.0, vat.as_str()),
        ];
        let mut y = top;
        for (step, text) in lines {
            y -= step;
            canvas.draw_string(g.left(), y, text, small);
        }

        if let Some(logo) = &self.logo {
            let logo_h = LOGO_WIDTH * logo.aspect_ratio();
            canvas.draw_image(
                g.right() - LOGO_WIDTH,
                top - logo_h + 15.0,
                LOGO_WIDTH,
                logo_h,
                Arc::clone(logo),
            );
        }
        top
    }

    /// Name, address and contact lines. Returns the last baseline drawn.
    fn draw_customer(&self, canvas: &mut Canvas, top: f64) -> f64 {
        let x = canvas.geometry().left() + 30.0;
        let style = TextStyle::regular(10.0);
        let mut y = top - 80.0;
        canvas.draw_string(x, y, &self.customer.name, style);
        for line in self
            .customer
            .address_lines
            .iter()
            .cloned()
            .chain(self.customer.contact_lines())
        {
            y -= 14.0;
            canvas.draw_string(x, y, &line, style);
        }
        y
    }

    fn draw_identity(&self, canvas: &mut Canvas, top: f64) {
        let g = *canvas.geometry();
        let doc_y = top - 75.0;
        canvas.draw_string(g.identity_x, doc_y, self.title, TextStyle::bold(16.0));
        canvas.draw_right_string(g.right(), doc_y, &self.number, TextStyle::bold(14.0));

        let style = TextStyle::regular(9.0);
        let mut y = doc_y - 16.0;
        for (label, value) in &self.details {
            canvas.draw_string(g.identity_x, y, label, style);
            canvas.draw_right_string(g.right(), y, value, style);
            y -= 13.0;
        }
    }
}

impl HeaderRenderer for CompanyHeader<'_> {
    fn draw_header(&self, canvas: &mut Canvas) -> f64 {
        let top = self.draw_company(canvas);
        let customer_bottom = self.draw_customer(canvas, top);
        self.draw_identity(canvas, top);
        (top - 170.0).min(customer_bottom - CUSTOMER_GAP)
    }
}

/// Header for job sheets.
pub struct JobSheetHeader<'a> {
    customer: &'a Customer,
    doc: &'a JobSheetIdentity,
}

impl<'a> JobSheetHeader<'a> {
    pub fn new(customer: &'a Customer, doc: &'a JobSheetIdentity) -> Self {
        Self { customer, doc }
    }

    fn details(&self) -> [(&'static str, String); 6] {
        [
            ("Account No:", self.doc.account_no.to_string()),
            ("Order Ref:", self.doc.order_ref.to_string()),
            ("Receive Date:", self.doc.receive_date.to_string()),
            ("Due Date:", self.doc.due_date.to_string()),
            ("Status:", self.doc.status.to_string()),
            ("Technician:", self.doc.technician.to_string()),
        ]
    }
}

impl HeaderRenderer for JobSheetHeader<'_> {
    fn draw_header(&self, canvas: &mut Canvas) -> f64 {
        let g = *canvas.geometry();
        let top = g.height() - 25.0;
        canvas.draw_centred_string(g.width() / 2.0, top, "Job Sheet", TextStyle::bold(20.0));

        // Job sheets only print the mobile number.
        let style = TextStyle::regular(10.0);
        let mut y = top - 28.0;
        canvas.draw_string(g.left(), y, &self.customer.name, style);
        for line in &self.customer.address_lines {
            y -= 14.0;
            canvas.draw_string(g.left(), y, line, style);
        }
        if let Some(mobile) = self.customer.mobile.as_deref().filter(|m| !m.is_empty()) {
            y -= 14.0;
            canvas.draw_string(g.left(), y, &format!("Mobile: {}", mobile), style);
        }

        let doc_x = g.identity_x;
        let doc_y = top - 28.0;
        let heading = TextStyle::bold(12.0);
        canvas.draw_string(doc_x, doc_y, "Doc Reference", heading);
        canvas.draw_right_string(g.right(), doc_y, &self.doc.reference.to_string(), heading);

        let detail = TextStyle::regular(9.0);
        let mut detail_y = doc_y - 14.0;
        for (label, value) in self.details() {
            canvas.draw_string(doc_x, detail_y, label, detail);
            canvas.draw_right_string(g.right(), detail_y, &value, detail);
            detail_y -= 13.0;
        }

        let cb_y = detail_y - 8.0;
        for (cb_x, label) in [(doc_x + 40.0, "In Progress"), (g.right() - 80.0, "Completed")] {
            canvas.stroke_rect(cb_x, cb_y - 2.0, CHECKBOX_SIZE, CHECKBOX_SIZE, Color::BLACK, 1.0);
            canvas.draw_string(cb_x + 14.0, cb_y, label, detail);
        }

        (cb_y - 25.0).min(y - CUSTOMER_GAP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PageGeometry;
    use crate::layout::DrawCommand;
    use crate::model::Scalar;

    fn company() -> Company {
        Company {
            name: "ELI MOTORS LIMITED".into(),
            address_line1: "49 VICTORIA ROAD, HENDON, LONDON, NW4 2RP".into(),
            phone: "020 8203 6449".into(),
            website: "www.elimotors.co.uk".into(),
            vat: "330 9339 65".into(),
        }
    }

    fn customer() -> Customer {
        Customer {
            name: "Mr Sassoon".into(),
            address_lines: vec!["5 Holmbrook Drive".into(), "London".into()],
            tel: Some("02082025738".into()),
            mobile: None,
            phone: None,
        }
    }

    fn texts(canvas: &Canvas) -> Vec<(String, f64, f64)> {
        canvas
            .current_elements()
            .iter()
            .filter_map(|e| match e {
                DrawCommand::Text { x, y, text, .. } => Some((text.clone(), *x, *y)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_company_header_returns_fixed_content_top() {
        let (company, customer) = (company(), customer());
        let header = CompanyHeader::new(
            &company,
            &customer,
            "Estimate",
            "6036".into(),
            vec![("Estimate Date:", "05/01/2026".into())],
            None,
        );
        let mut canvas = Canvas::new(PageGeometry::default());
        let y = header.draw_header(&mut canvas);
        let top = 841.89 - 25.0;
        assert!((y - (top - 170.0)).abs() < 1e-9);

        let texts = texts(&canvas);
        let vat = texts.iter().find(|t| t.0 == "VAT 330 9339 65").unwrap();
        assert!((vat.2 - (top - 49.0)).abs() < 1e-9);
        let tel = texts.iter().find(|t| t.0 == "Tel: 02082025738").unwrap();
        assert_eq!(tel.1, 60.0);
        assert!((tel.2 - (top - 80.0 - 42.0)).abs() < 1e-9);
        let title = texts.iter().find(|t| t.0 == "Estimate").unwrap();
        assert_eq!(title.1, 340.0);
    }

    #[test]
    fn test_logo_sized_from_aspect_ratio() {
        let (company, customer) = (company(), customer());
        let logo = Arc::new(LoadedImage {
            pixel_data: crate::image_loader::ImagePixelData::Decoded {
                rgb: vec![0; 2 * 3],
                alpha: None,
            },
            width_px: 2,
            height_px: 1,
        });
        let header = CompanyHeader::new(&company, &customer, "Invoice", "1".into(), vec![], Some(logo));
        let mut canvas = Canvas::new(PageGeometry::default());
        header.draw_header(&mut canvas);
        let image = canvas
            .current_elements()
            .iter()
            .find_map(|e| match e {
                DrawCommand::Image { x, y, width, height, .. } => Some((*x, *y, *width, *height)),
                _ => None,
            })
            .unwrap();
        assert!((image.0 - (565.28 - 120.0)).abs() < 1e-9);
        assert_eq!(image.2, 120.0);
        assert_eq!(image.3, 60.0);
        assert!((image.1 - (841.89 - 25.0 - 60.0 + 15.0)).abs() < 1e-9);
    }

    #[test]
    fn test_long_customer_block_pushes_content_down() {
        let company = company();
        let customer = Customer {
            address_lines: (1..=9).map(|i| format!("Address line {}", i)).collect(),
            ..customer()
        };
        let header = CompanyHeader::new(&company, &customer, "Invoice", "1".into(), vec![], None);
        let mut canvas = Canvas::new(PageGeometry::default());
        let y = header.draw_header(&mut canvas);

        // name, nine address lines, then the Tel line
        let top = 841.89 - 25.0;
        let last = top - 80.0 - 10.0 * 14.0;
        assert!((y - (last - 20.0)).abs() < 1e-9);
        let lowest = texts(&canvas).iter().map(|t| t.2).fold(f64::INFINITY, f64::min);
        assert!(lowest > y);
    }

    #[test]
    fn test_job_sheet_long_customer_block_pushes_content_down() {
        let customer = Customer {
            address_lines: (1..=12).map(|i| format!("Address line {}", i)).collect(),
            mobile: Some("07376200273".into()),
            ..customer()
        };
        let doc = JobSheetIdentity {
            reference: Scalar::from("JS 1"),
            account_no: Scalar::default(),
            order_ref: Scalar::default(),
            receive_date: Scalar::default(),
            due_date: Scalar::default(),
            status: Scalar::default(),
            technician: Scalar::default(),
        };
        let header = JobSheetHeader::new(&customer, &doc);
        let mut canvas = Canvas::new(PageGeometry::default());
        let y = header.draw_header(&mut canvas);

        let top = 841.89 - 25.0;
        let mobile = top - 28.0 - 13.0 * 14.0;
        assert!((y - (mobile - 20.0)).abs() < 1e-9);
        let lowest = texts(&canvas).iter().map(|t| t.2).fold(f64::INFINITY, f64::min);
        assert!(lowest > y);
    }

    #[test]
    fn test_job_sheet_header_checkboxes_below_details() {
        let customer = Customer {
            mobile: Some("07376200273".into()),
            ..customer()
        };
        let doc = JobSheetIdentity {
            reference: Scalar::from("JS 92379"),
            account_no: Scalar::from("RES002"),
            order_ref: Scalar::default(),
            receive_date: Scalar::from("10/02/2026"),
            due_date: Scalar::from("10/02/2026"),
            status: Scalar::from("~"),
            technician: Scalar::default(),
        };
        let header = JobSheetHeader::new(&customer, &doc);
        let mut canvas = Canvas::new(PageGeometry::default());
        let y = header.draw_header(&mut canvas);

        let top = 841.89 - 25.0;
        // details start 14 below the panel, six rows of 13, then 8 to the boxes
        let cb_y = top - 28.0 - 14.0 - 6.0 * 13.0 - 8.0;
        assert!((y - (cb_y - 25.0)).abs() < 1e-9);

        let boxes = canvas
            .current_elements()
            .iter()
            .filter(|e| matches!(e, DrawCommand::Rect { stroke: Some(_), fill: None, .. }))
            .count();
        assert_eq!(boxes, 2);
        let texts = texts(&canvas);
        assert!(texts.iter().any(|t| t.0 == "Mobile: 07376200273"));
        assert!(!texts.iter().any(|t| t.0.starts_with("Tel:")));
    }
}
